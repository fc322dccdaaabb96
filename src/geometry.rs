/// Axis-aligned box in screen space: y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Open-interval overlap on the x axis: touching edges do not overlap.
    pub fn overlaps_x(&self, left: f64, right: f64) -> bool {
        self.right() > left && self.left() < right
    }

    /// True when the box sits strictly between `top` and `bottom`.
    pub fn strictly_within_y(&self, top: f64, bottom: f64) -> bool {
        self.top() > top && self.bottom() < bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges() {
        let r = Rect::new(10.0, 20.0, 5.0, 7.0);
        assert_eq!(r.right(), 15.0);
        assert_eq!(r.bottom(), 27.0);
    }

    #[test]
    fn touching_is_not_overlap() {
        let r = Rect::new(10.0, 0.0, 5.0, 5.0);
        assert!(!r.overlaps_x(15.0, 20.0));
        assert!(!r.overlaps_x(0.0, 10.0));
        assert!(r.overlaps_x(14.5, 20.0));
    }

    #[test]
    fn within_is_strict() {
        let r = Rect::new(0.0, 10.0, 5.0, 10.0);
        assert!(r.strictly_within_y(9.0, 21.0));
        assert!(!r.strictly_within_y(10.0, 21.0));
        assert!(!r.strictly_within_y(9.0, 20.0));
    }
}
