//! Parity-check matrix in compressed-sparse-column form, and its Tanner graph

use serde::{Deserialize, Serialize};

use crate::{Bit, Error};

/// Parity-check matrix of an LDPC code, in compressed-sparse-column (CSC) form
///
/// The matrix is validated on construction and immutable thereafter.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ParityCheckMatrix {
    /// Number of rows (parity checks)
    n_rows: usize,
    /// Number of columns (code bits)
    n_cols: usize,
    /// Index into `row_index` of the first entry of each column (length `n_cols + 1`)
    column_pointers: Vec<usize>,
    /// Row index of each nonzero entry, in column-major order
    row_index: Vec<usize>,
}

/// On-disk representation of a parity-check matrix
#[derive(Deserialize, Serialize)]
struct MatrixFile {
    n_rows: usize,
    n_cols: usize,
    column_pointers: Vec<usize>,
    row_index: Vec<usize>,
}

impl ParityCheckMatrix {
    /// Returns parity-check matrix with given dimensions and CSC arrays.
    ///
    /// # Parameters
    ///
    /// - `n_rows`: Number of rows (parity checks).
    ///
    /// - `n_cols`: Number of columns (code bits).
    ///
    /// - `column_pointers`: Index into `row_index` of the first entry of each column. Must have
    ///   length `n_cols + 1`, start at `0`, be non-decreasing, and end at `row_index.len()`.
    ///
    /// - `row_index`: Row index of each nonzero entry, in column-major order. Every value must be
    ///   less than `n_rows`.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSC arrays violate any of the conditions above.
    ///
    /// # Examples
    ///
    /// ```
    /// use ldpc_bp::ParityCheckMatrix;
    ///
    /// // H = [1 0 1 0 1 0 1
    /// //      0 1 1 0 0 1 1
    /// //      0 0 0 1 1 1 1]
    /// let matrix = ParityCheckMatrix::new(
    ///     3,
    ///     7,
    ///     vec![0, 1, 2, 4, 5, 7, 9, 12],
    ///     vec![0, 1, 0, 1, 2, 0, 2, 1, 2, 0, 1, 2],
    /// )?;
    /// assert_eq!(matrix.num_entries(), 12);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        column_pointers: Vec<usize>,
        row_index: Vec<usize>,
    ) -> Result<Self, Error> {
        if column_pointers.len() != n_cols + 1 {
            return Err(Error::InvalidMatrix(format!(
                "Expected {} column pointers for {n_cols} columns, found {}",
                n_cols + 1,
                column_pointers.len()
            )));
        }
        if column_pointers[0] != 0 {
            return Err(Error::InvalidMatrix(format!(
                "First column pointer must be 0, found {}",
                column_pointers[0]
            )));
        }
        if column_pointers.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::InvalidMatrix(
                "Column pointers must be non-decreasing".to_string(),
            ));
        }
        if column_pointers[n_cols] != row_index.len() {
            return Err(Error::InvalidMatrix(format!(
                "Last column pointer {} does not match number of entries {}",
                column_pointers[n_cols],
                row_index.len()
            )));
        }
        if let Some(&bad_row) = row_index.iter().find(|&&row| row >= n_rows) {
            return Err(Error::InvalidMatrix(format!(
                "Row index {bad_row} out of range for matrix with {n_rows} rows",
            )));
        }
        Ok(Self {
            n_rows,
            n_cols,
            column_pointers,
            row_index,
        })
    }

    /// Returns parity-check matrix read from a JSON file.
    ///
    /// The file must hold an object with fields `n_rows`, `n_cols`, `column_pointers`, and
    /// `row_index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the CSC arrays it holds are
    /// invalid (see [`ParityCheckMatrix::new`]).
    pub fn from_json_file(filename: &str) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(filename)?;
        let file: MatrixFile = serde_json::from_str(&contents)?;
        Self::new(
            file.n_rows,
            file.n_cols,
            file.column_pointers,
            file.row_index,
        )
    }

    /// Writes parity-check matrix to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn to_json_file(&self, filename: &str) -> Result<(), Error> {
        let file = MatrixFile {
            n_rows: self.n_rows,
            n_cols: self.n_cols,
            column_pointers: self.column_pointers.clone(),
            row_index: self.row_index.clone(),
        };
        serde_json::to_writer_pretty(std::fs::File::create(filename)?, &file)?;
        Ok(())
    }

    /// Returns number of rows (parity checks).
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.n_rows
    }

    /// Returns number of columns (code bits).
    #[must_use]
    pub fn num_cols(&self) -> usize {
        self.n_cols
    }

    /// Returns number of nonzero entries.
    #[must_use]
    pub fn num_entries(&self) -> usize {
        self.row_index.len()
    }

    /// Returns the syndrome of a given word, i.e., the GF(2) matrix-vector product `H * word`.
    ///
    /// For every set bit of the word, the rows of the corresponding column are toggled (XOR
    /// accumulation). The map is linear over GF(2):
    /// `syndrome(a) XOR syndrome(b) == syndrome(a XOR b)`.
    ///
    /// # Parameters
    ///
    /// - `word`: Candidate bit vector of length `num_cols()`.
    ///
    /// # Errors
    ///
    /// Returns an error if `word.len()` is not equal to `num_cols()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ldpc_bp::{Bit, ParityCheckMatrix};
    /// use Bit::{One, Zero};
    ///
    /// let matrix = ParityCheckMatrix::new(
    ///     3,
    ///     7,
    ///     vec![0, 1, 2, 4, 5, 7, 9, 12],
    ///     vec![0, 1, 0, 1, 2, 0, 2, 1, 2, 0, 1, 2],
    /// )?;
    /// let word = [Zero, Zero, One, Zero, Zero, Zero, Zero];
    /// assert_eq!(matrix.syndrome(&word)?, [One, One, Zero]);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn syndrome(&self, word: &[Bit]) -> Result<Vec<Bit>, Error> {
        if word.len() != self.n_cols {
            return Err(Error::InvalidInput(format!(
                "Invalid word length (expected {}, found {})",
                self.n_cols,
                word.len()
            )));
        }
        let mut out = vec![Bit::Zero; self.n_rows];
        for (col, &bit) in word.iter().enumerate() {
            if bit == Bit::One {
                for &row in &self.row_index[self.column_pointers[col] .. self.column_pointers[col + 1]] {
                    out[row] = out[row].flipped();
                }
            }
        }
        Ok(out)
    }
}

/// Tanner graph of a parity-check matrix
///
/// Every nonzero entry of the matrix is an edge between a check node (row) and a variable node
/// (column), and carries a global edge id equal to its position in the CSC `row_index` array.
/// Both endpoint views of an edge record the same id, so message arrays indexed by edge id stay
/// aligned between the check-node and variable-node update phases without any positional
/// bookkeeping.
///
/// The graph is built once per code and is read-only thereafter; it may be shared freely across
/// concurrent decode calls.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct TannerGraph {
    /// For each check node, the incident `(variable, edge_id)` pairs in ascending variable order
    pub(crate) check_edges: Vec<Vec<(usize, usize)>>,
    /// For each variable node, the incident `(check, edge_id)` pairs in ascending check order
    pub(crate) var_edges: Vec<Vec<(usize, usize)>>,
    /// Total number of edges (nonzero entries of the matrix)
    pub(crate) num_edges: usize,
}

impl TannerGraph {
    /// Returns Tanner graph of the given parity-check matrix.
    ///
    /// # Examples
    ///
    /// ```
    /// use ldpc_bp::{ParityCheckMatrix, TannerGraph};
    ///
    /// let matrix = ParityCheckMatrix::new(
    ///     3,
    ///     7,
    ///     vec![0, 1, 2, 4, 5, 7, 9, 12],
    ///     vec![0, 1, 0, 1, 2, 0, 2, 1, 2, 0, 1, 2],
    /// )?;
    /// let graph = TannerGraph::new(&matrix);
    /// assert_eq!(graph.num_checks(), 3);
    /// assert_eq!(graph.num_variables(), 7);
    /// assert_eq!(graph.num_edges(), 12);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[must_use]
    pub fn new(matrix: &ParityCheckMatrix) -> Self {
        let mut check_edges: Vec<Vec<(usize, usize)>> = vec![Vec::new(); matrix.n_rows];
        for col in 0 .. matrix.n_cols {
            for edge in matrix.column_pointers[col] .. matrix.column_pointers[col + 1] {
                check_edges[matrix.row_index[edge]].push((col, edge));
            }
        }
        let mut var_edges: Vec<Vec<(usize, usize)>> = vec![Vec::new(); matrix.n_cols];
        for (check, edges) in check_edges.iter().enumerate() {
            for &(var, edge) in edges {
                var_edges[var].push((check, edge));
            }
        }
        Self {
            check_edges,
            var_edges,
            num_edges: matrix.num_entries(),
        }
    }

    /// Returns number of check nodes.
    #[must_use]
    pub fn num_checks(&self) -> usize {
        self.check_edges.len()
    }

    /// Returns number of variable nodes.
    #[must_use]
    pub fn num_variables(&self) -> usize {
        self.var_edges.len()
    }

    /// Returns number of edges.
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }
}


#[cfg(test)]
mod tests_of_tanner_graph {
    use super::*;

    fn example_graph() -> TannerGraph {
        let matrix = ParityCheckMatrix::new(
            3,
            7,
            vec![0, 1, 2, 4, 5, 7, 9, 12],
            vec![0, 1, 0, 1, 2, 0, 2, 1, 2, 0, 1, 2],
        )
        .unwrap();
        TannerGraph::new(&matrix)
    }

    #[test]
    fn test_new() {
        let graph = example_graph();
        assert_eq!(graph.num_checks(), 3);
        assert_eq!(graph.num_variables(), 7);
        assert_eq!(graph.num_edges(), 12);
        assert_eq!(
            graph.check_edges,
            [
                vec![(0, 0), (2, 2), (4, 5), (6, 9)],
                vec![(1, 1), (2, 3), (5, 7), (6, 10)],
                vec![(3, 4), (4, 6), (5, 8), (6, 11)],
            ]
        );
        assert_eq!(
            graph.var_edges,
            [
                vec![(0, 0)],
                vec![(1, 1)],
                vec![(0, 2), (1, 3)],
                vec![(2, 4)],
                vec![(0, 5), (2, 6)],
                vec![(1, 7), (2, 8)],
                vec![(0, 9), (1, 10), (2, 11)],
            ]
        );
    }

    #[test]
    fn test_edge_symmetry() {
        // Every edge must appear in both endpoint views with the same edge id, and each view
        // must cover every edge exactly once.
        let graph = example_graph();
        for (check, edges) in graph.check_edges.iter().enumerate() {
            for &(var, edge) in edges {
                assert!(graph.var_edges[var].contains(&(check, edge)));
            }
        }
        for (var, edges) in graph.var_edges.iter().enumerate() {
            for &(check, edge) in edges {
                assert!(graph.check_edges[check].contains(&(var, edge)));
            }
        }
        let mut edge_ids: Vec<usize> = graph
            .check_edges
            .iter()
            .flatten()
            .map(|&(_, edge)| edge)
            .collect();
        edge_ids.sort_unstable();
        assert!(edge_ids.into_iter().eq(0 .. graph.num_edges()));
    }

    #[test]
    fn test_neighbor_ordering() {
        // Per-check lists ascend by variable, per-variable lists ascend by check.
        let graph = example_graph();
        for edges in &graph.check_edges {
            assert!(edges.windows(2).all(|w| w[0].0 < w[1].0));
        }
        for edges in &graph.var_edges {
            assert!(edges.windows(2).all(|w| w[0].0 < w[1].0));
        }
    }
}
