//! Constraint documents used across the test suites.

/// The smallest useful document: every cell at least 1, the top-left cell
/// pinned to 5. Minimal grid is `[[5, 1], [1, 1]]`.
pub const PINNED_CORNER: &str = "2 , 2 ;\nA[i][j] >= 1 ;\nA[0][0] = 5 ;\n";

/// Contradictory bounds on every cell.
pub const CONTRADICTION: &str = "2, 3;\nA[i][j] >= 0;\nA[i][j] < 0;\n";

/// `A[i][j] < 0` alone is satisfiable: cells range over signed integers.
pub const NEGATIVE_ONLY: &str = "1, 2;\nA[i][j] < 0;\nA[i][j] >= -3;\n";

/// A strictly increasing row. Minimal grid is `[[1, 2, 3]]`.
pub const INCREASING_ROW: &str = "1, 3;\n\
A[i][j] >= 1;\n\
A[0][0] < A[0][1];\n\
A[0][1] < A[0][2];\n";

/// A free symbol `k` shared by every instantiation. Minimal grid is
/// `[[2, 2, 2]]` with `k = 2`.
pub const SHARED_SYMBOL: &str = "1, 3;\nA[i][j] >= k;\nk >= 2;\n";

/// Cells addressed from index 1; solved with one-based padding the minimal
/// grid is `[[4, 1], [1, 1]]`.
pub const ONE_BASED: &str = "2, 2;\nA[i][j] >= 1;\nA[1][1] = 4;\n";

/// Looks one row past the last one for every cell of the bottom row.
pub const OUT_OF_RANGE: &str = "2, 2;\nA[i][j] < A[i+1][j];\n";

/// Neighbouring cells must differ, expressed through squared differences.
pub const NEIGHBOURS_DIFFER: &str = "3, 3;\n\
A[i][j] > 0;\n\
A[2][2] = 3;\n\
(A[i][j] - A[i+1][j])*(A[i][j] - A[i+1][j]) >= 1 ;\n\
(A[i][j] - A[i][j+1])*(A[i][j] - A[i][j+1]) >= 1;\n";

/// Lines 2 and 4 are malformed: a missing terminator and a doubled operator.
pub const MALFORMED: &str = "2, 2;\n\
A[i][j] >= 1\n\
A[0][0] = 5;\n\
A[i][j] = = 2;\n";

/// Blank lines between conditions are skipped.
pub const WITH_BLANK_LINES: &str = "2,2;\n\nA[i][j] >= 1;\n   \nA[1][1] = 2;\n\n";
