use labels::{LabelOptions, NormalizedBox};

/// Pixel rectangle, `right`/`bottom` exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelBox {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn translate(self, dx: i32, dy: i32) -> Self {
        Self::new(self.left + dx, self.top + dy, self.right + dx, self.bottom + dy)
    }

    pub fn padded(self, p: i32) -> Self {
        Self::new(self.left - p, self.top - p, self.right + p, self.bottom + p)
    }

    pub fn normalize(&self, class_id: usize, image_size: (u32, u32)) -> NormalizedBox {
        NormalizedBox::from_corner(
            class_id,
            (self.left as f64, self.top as f64),
            (self.width() as f64, self.height() as f64),
            image_size,
            LabelOptions::default(),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphBox {
    pub ch: char,
    pub bbox: PixelBox,
}
