/// Conversion of a scalar-or-pair hyper-parameter into a `(height, width)` pair.
///
/// 2-D layers accept `3`, `(3, 5)` or `[3, 5]` wherever a kernel size, stride or
/// padding is expected.
pub trait IntoPair {
    fn into_pair(self) -> (usize, usize);
}

impl IntoPair for usize {
    fn into_pair(self) -> (usize, usize) {
        (self, self)
    }
}

impl IntoPair for (usize, usize) {
    fn into_pair(self) -> (usize, usize) {
        self
    }
}

impl IntoPair for [usize; 2] {
    fn into_pair(self) -> (usize, usize) {
        (self[0], self[1])
    }
}

/// Expands a scalar into `(v, v)`; pairs pass through unchanged.
pub fn pair_value<P: IntoPair>(value: P) -> (usize, usize) {
    value.into_pair()
}
