use std::fmt;

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
    /// Number of pixels covered by a size.
    pub fn area(&self) -> usize {
        self.x * self.y
    }

    /// True if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.x == 0 || self.y == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_and_empty() {
        assert_eq!(Vec2::new(640usize, 480).area(), 307_200);
        assert!(Vec2::new(0usize, 480).is_empty());
        assert!(Vec2::new(640usize, 0).is_empty());
        assert!(!Vec2::new(1usize, 1).is_empty());
        assert!(Vec2::<usize>::zero().is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(Vec2::new(640usize, 480).to_string(), "640x480");
    }
}
