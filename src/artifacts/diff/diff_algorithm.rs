use derive_new::new;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit<T> {
    Delete { value: T },
    Insert { value: T },
    Equal { value: T },
}

impl<T> Edit<T> {
    pub fn value(&self) -> &T {
        match self {
            Edit::Delete { value } | Edit::Insert { value } | Edit::Equal { value } => value,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, Edit::Equal { .. })
    }
}

impl<T> Edit<T>
where
    T: Clone + Into<String>,
{
    pub fn as_string(&self) -> String {
        match self {
            Edit::Delete { value } => format!("-{}", value.clone().into()),
            Edit::Insert { value } => format!("+{}", value.clone().into()),
            Edit::Equal { value } => format!(" {}", value.clone().into()),
        }
    }
}

impl<T> Display for Edit<T>
where
    T: Clone + Into<String>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

pub trait DiffAlgorithm<'d, T> {
    type Trace;
    type EditPath;
    type EditScript;
    type Output;

    fn compute_shortest_edit(&self) -> Self::Trace;
    fn backtrack(&self) -> Self::EditPath;
    fn diff(&self) -> Self::EditScript;
    fn format_diff(&self) -> Self::Output
    where
        T: Clone + Into<String>,
        Self::EditScript: AsRef<[Edit<T>]>,
        Self::Output: From<String>,
    {
        let edits = self.diff();
        let formatted = edits
            .as_ref()
            .iter()
            .map(|edit| edit.as_string())
            .collect::<Vec<_>>()
            .join("\n");
        formatted.into()
    }
}

/// Longest-common-subsequence diff
///
/// The trace is the suffix table `lcs[i][j]`, the length of the longest common subsequence of
/// `a[i..]` and `b[j..]`. The edit path walks it forward from `(0, 0)`: equal items advance both
/// sides, otherwise the side that keeps the longer subsequence is consumed, deletions first on
/// ties. A changed line therefore always reads as its deletion followed by its insertion.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct LcsDiff<'d, T> {
    a: &'d [T],
    b: &'d [T],
}

impl<'d, T: Eq + Clone> DiffAlgorithm<'d, T> for LcsDiff<'d, T> {
    type Trace = Vec<Vec<usize>>;
    type EditPath = Vec<(usize, usize, usize, usize)>;
    type EditScript = Vec<Edit<T>>;
    type Output = String;

    fn compute_shortest_edit(&self) -> Self::Trace {
        let (n, m) = (self.a.len(), self.b.len());
        let mut lcs = vec![vec![0; m + 1]; n + 1];

        for i in (0..n).rev() {
            for j in (0..m).rev() {
                lcs[i][j] = if self.a[i] == self.b[j] {
                    lcs[i + 1][j + 1] + 1
                } else {
                    lcs[i + 1][j].max(lcs[i][j + 1])
                };
            }
        }

        lcs
    }

    fn backtrack(&self) -> Self::EditPath {
        let (n, m) = (self.a.len(), self.b.len());
        let lcs = self.compute_shortest_edit();

        let (mut x, mut y) = (0, 0);
        let mut edit_path = Vec::with_capacity(n + m);

        while x < n || y < m {
            let (next_x, next_y) = if x < n && y < m && self.a[x] == self.b[y] {
                // diagonal move
                (x + 1, y + 1)
            } else if y == m || (x < n && lcs[x + 1][y] >= lcs[x][y + 1]) {
                (x + 1, y)
            } else {
                (x, y + 1)
            };

            edit_path.push((x, y, next_x, next_y));
            (x, y) = (next_x, next_y);
        }

        edit_path
    }

    fn diff(&self) -> Self::EditScript {
        self.backtrack()
            .into_iter()
            .map(|(prev_x, prev_y, x, y)| {
                if x == prev_x {
                    // Insert: only y increased
                    Edit::Insert {
                        value: self.b[prev_y].clone(),
                    }
                } else if y == prev_y {
                    // Delete: only x increased
                    Edit::Delete {
                        value: self.a[prev_x].clone(),
                    }
                } else {
                    Edit::Equal {
                        value: self.a[prev_x].clone(),
                    }
                }
            })
            .collect()
    }
}
