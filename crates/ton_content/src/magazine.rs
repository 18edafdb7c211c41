//! Magazines: the stored record and the generated structure.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A published weekly magazine.
///
/// `post_ids` is a snapshot frozen at creation time; later edits or
/// deletions of the source posts do not touch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Magazine {
    /// Document id
    pub id: Uuid,
    /// Magazine title
    pub title: String,
    /// Location of the rendered PDF
    pub file_url: String,
    /// Ids of the posts snapshotted into this issue
    pub post_ids: Vec<Uuid>,
    /// Creation timestamp
    pub created_at: NaiveDateTime,
}

/// A condensed view of a post handed to the magazine flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    /// Source post id
    pub id: Uuid,
    /// Headline
    pub title: String,
    /// URL slug
    pub slug: String,
    /// Truncated body text
    pub excerpt: String,
    /// Post tags
    pub tags: Vec<String>,
    /// Cover image URL
    pub cover_image: String,
}

/// A generated Sudoku puzzle and its solution.
///
/// Both grids are 9x9; 0 marks a blank cell in the puzzle. Validity (single
/// solution, solvable) is trusted from the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SudokuPair {
    /// The puzzle grid, 0 = blank
    pub puzzle: Vec<Vec<u8>>,
    /// The completed grid
    pub solution: Vec<Vec<u8>>,
}

impl SudokuPair {
    /// Check both grids are 9x9 with cell values in range (puzzle 0-9,
    /// solution 1-9). Does not check solvability.
    pub fn is_well_formed(&self) -> bool {
        let shape = |grid: &[Vec<u8>]| grid.len() == 9 && grid.iter().all(|row| row.len() == 9);
        shape(&self.puzzle)
            && shape(&self.solution)
            && self.puzzle.iter().flatten().all(|&c| c <= 9)
            && self.solution.iter().flatten().all(|&c| (1..=9).contains(&c))
    }
}

/// One themed section of a magazine issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagazineSection {
    /// Section title
    pub title: String,
    /// Multi-paragraph section summary
    pub summary: Vec<String>,
    /// Slugs of the articles grouped under this section
    pub article_slugs: Vec<String>,
}

/// The structured magazine produced by the generation flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagazineContent {
    /// Issue title
    pub title: String,
    /// Multi-paragraph introduction
    pub introduction: Vec<String>,
    /// Themed sections
    pub sections: Vec<MagazineSection>,
    /// Three or four highlight strings for the cover
    pub highlights: Vec<String>,
    /// The closing puzzle page
    pub sudoku: SudokuPair,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_grid(value: u8) -> Vec<Vec<u8>> {
        vec![vec![value; 9]; 9]
    }

    #[test]
    fn well_formed_grids_pass() {
        let pair = SudokuPair {
            puzzle: filled_grid(0),
            solution: filled_grid(5),
        };
        assert!(pair.is_well_formed());
    }

    #[test]
    fn short_row_fails() {
        let mut puzzle = filled_grid(0);
        puzzle[3].pop();
        let pair = SudokuPair {
            puzzle,
            solution: filled_grid(1),
        };
        assert!(!pair.is_well_formed());
    }

    #[test]
    fn blank_in_solution_fails() {
        let pair = SudokuPair {
            puzzle: filled_grid(0),
            solution: filled_grid(0),
        };
        assert!(!pair.is_well_formed());
    }

    #[test]
    fn out_of_range_cell_fails() {
        let mut puzzle = filled_grid(0);
        puzzle[0][0] = 10;
        let pair = SudokuPair {
            puzzle,
            solution: filled_grid(9),
        };
        assert!(!pair.is_well_formed());
    }
}
