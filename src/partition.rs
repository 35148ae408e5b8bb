/// In-place partition of a slice: elements satisfying `predicate` are moved to
/// the front, and the number of such elements is returned. Order within each
/// half is not preserved.
pub trait Partition<T> {
    fn partition<F: Fn(&T) -> bool>(&mut self, predicate: F) -> usize;
}

impl<T> Partition<T> for [T] {
    fn partition<F: Fn(&T) -> bool>(&mut self, predicate: F) -> usize {
        let mut split = 0;
        for i in 0..self.len() {
            if predicate(&self[i]) {
                self.swap(split, i);
                split += 1;
            }
        }
        split
    }
}
