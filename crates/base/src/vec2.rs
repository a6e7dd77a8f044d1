use std::fmt;

/// Two-component vector. Image sizes are `Vec2<usize>` with `x` = width, `y` = height.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vec2<T> {
    pub x: T,
    pub y: T,
}

impl<T: fmt::Debug> fmt::Debug for Vec2<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vec2")
            .field("x", &self.x)
            .field("y", &self.y)
            .finish()
    }
}

impl<T: fmt::Display> fmt::Display for Vec2<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.x, self.y)
    }
}

impl<T: Default> Default for Vec2<T> {
    fn default() -> Self {
        Self {
            x: T::default(),
            y: T::default(),
        }
    }
}

impl<T> Vec2<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T: Default> Vec2<T> {
    pub fn zero() -> Self {
        Self::default()
    }
}

impl Vec2<usize> {
    /// Number of pixels in an image of this size.
    pub fn area(self) -> usize {
        self.x * self.y
    }

    /// `area`, or `None` if it does not fit in a `usize`.
    pub fn checked_area(self) -> Option<usize> {
        self.x.checked_mul(self.y)
    }

    /// Whether the signed pixel coordinate lies inside `[0, x) × [0, y)`.
    pub fn contains(self, u: i64, v: i64) -> bool {
        u >= 0 && v >= 0 && (u as u64) < self.x as u64 && (v as u64) < self.y as u64
    }

    /// Row-major index of an in-bounds pixel.
    pub fn index(self, u: usize, v: usize) -> usize {
        v * self.x + u
    }
}
