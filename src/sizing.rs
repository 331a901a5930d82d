//! Pure resize helpers for the row arrays and sparse grids of a layout.
//!
//! Every helper consumes its container and returns a correctly sized one.
//! Out-of-range positions leave the container untouched so callers can pass
//! indices straight from interactive edits.

/// A rows×cols grid of optional entries. Every row has the same length.
pub type Matrix<T> = Vec<Vec<Option<T>>>;

/// Create an empty `rows × cols` matrix.
pub fn new_matrix<T>(rows: usize, cols: usize) -> Matrix<T> {
    (0..rows).map(|_| empty_row(cols)).collect()
}

fn empty_row<T>(cols: usize) -> Vec<Option<T>> {
    (0..cols).map(|_| None).collect()
}

/// Resize a sequence to `len`, truncating or padding with `fill`.
pub fn to_size<T: Clone>(mut values: Vec<T>, len: usize, fill: T) -> Vec<T> {
    values.resize(len, fill);
    values
}

/// Resize a matrix to `rows × cols`. Surviving entries keep their position.
pub fn matrix_to_size<T>(mut matrix: Matrix<T>, rows: usize, cols: usize) -> Matrix<T> {
    matrix.truncate(rows);
    for row in &mut matrix {
        row.truncate(cols);
        row.resize_with(cols, || None);
    }
    matrix.resize_with(rows, || empty_row(cols));
    matrix
}

/// Insert `fill` at `at` (0 ≤ at ≤ len).
pub fn insert_at<T>(mut values: Vec<T>, at: usize, fill: T) -> Vec<T> {
    if at <= values.len() {
        values.insert(at, fill);
    }
    values
}

/// Remove the element at `at` (0 ≤ at < len).
pub fn remove_at<T>(mut values: Vec<T>, at: usize) -> Vec<T> {
    if at < values.len() {
        values.remove(at);
    }
    values
}

/// Insert an empty row of `cols` entries before row `at`.
pub fn insert_row<T>(matrix: Matrix<T>, at: usize, cols: usize) -> Matrix<T> {
    insert_at(matrix, at, empty_row(cols))
}

/// Remove row `at`.
pub fn remove_row<T>(matrix: Matrix<T>, at: usize) -> Matrix<T> {
    remove_at(matrix, at)
}

/// Insert an empty column before column `at` in every row.
pub fn insert_column<T>(matrix: Matrix<T>, at: usize) -> Matrix<T> {
    matrix.into_iter().map(|row| insert_at(row, at, None)).collect()
}

/// Remove column `at` from every row.
pub fn remove_column<T>(matrix: Matrix<T>, at: usize) -> Matrix<T> {
    matrix.into_iter().map(|row| remove_at(row, at)).collect()
}

/// Copy a matrix entry by entry through `copy`.
pub fn deep_clone<T, F>(matrix: &Matrix<T>, mut copy: F) -> Matrix<T>
where
    F: FnMut(&T) -> T,
{
    matrix
        .iter()
        .map(|row| row.iter().map(|cell| cell.as_ref().map(&mut copy)).collect())
        .collect()
}
