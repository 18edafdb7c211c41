//! Plain-text magazine rendering for simple downloads.

use ton_content::{MagazineContent, PostSummary};

/// Render a magazine as unstyled plain text: cover block, one block per
/// section, and the closing puzzle grids.
pub fn render_text(content: &MagazineContent, posts: &[PostSummary]) -> String {
    let mut out = String::new();
    let rule = "=".repeat(60);

    out.push_str(&rule);
    out.push('\n');
    out.push_str(&content.title);
    out.push('\n');
    out.push_str(&rule);
    out.push_str("\n\n");

    if !content.highlights.is_empty() {
        out.push_str("IN THIS ISSUE\n");
        for highlight in &content.highlights {
            out.push_str(&format!("  * {highlight}\n"));
        }
        out.push('\n');
    }

    for paragraph in &content.introduction {
        out.push_str(paragraph);
        out.push_str("\n\n");
    }

    for section in &content.sections {
        out.push_str(&format!("--- {} ---\n\n", section.title));
        for paragraph in &section.summary {
            out.push_str(paragraph);
            out.push_str("\n\n");
        }
        for slug in &section.article_slugs {
            if let Some(post) = posts.iter().find(|p| &p.slug == slug) {
                out.push_str(&format!("  {} [{}]\n", post.title, post.tags.join(", ")));
            }
        }
        out.push('\n');
    }

    out.push_str("--- SUDOKU ---\n\nPuzzle:\n");
    out.push_str(&render_grid(&content.sudoku.puzzle));
    out.push_str("\nSolution:\n");
    out.push_str(&render_grid(&content.sudoku.solution));
    out
}

fn render_grid(grid: &[Vec<u8>]) -> String {
    let mut out = String::new();
    for row in grid {
        let cells: Vec<String> = row
            .iter()
            .map(|&c| {
                if c == 0 {
                    ".".to_string()
                } else {
                    c.to_string()
                }
            })
            .collect();
        out.push_str(&format!("  {}\n", cells.join(" ")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ton_content::{MagazineSection, SudokuPair};
    use uuid::Uuid;

    fn content() -> MagazineContent {
        MagazineContent {
            title: "Talk of Nations Weekly".to_string(),
            introduction: vec!["A big week.".to_string()],
            sections: vec![MagazineSection {
                title: "Economy".to_string(),
                summary: vec!["Power and payments.".to_string()],
                article_slugs: vec!["geothermal-boom".to_string()],
            }],
            highlights: vec!["Geothermal hits 50%".to_string()],
            sudoku: SudokuPair {
                puzzle: vec![vec![0; 9]; 9],
                solution: vec![vec![5; 9]; 9],
            },
        }
    }

    fn posts() -> Vec<PostSummary> {
        vec![PostSummary {
            id: Uuid::from_u128(1),
            title: "Geothermal Boom".to_string(),
            slug: "geothermal-boom".to_string(),
            excerpt: String::new(),
            tags: vec!["Business".to_string()],
            cover_image: String::new(),
        }]
    }

    #[test]
    fn text_rendering_carries_every_part() {
        let text = render_text(&content(), &posts());
        assert!(text.contains("Talk of Nations Weekly"));
        assert!(text.contains("* Geothermal hits 50%"));
        assert!(text.contains("--- Economy ---"));
        assert!(text.contains("Geothermal Boom [Business]"));
        assert!(text.contains("Puzzle:"));
        // Blanks render as dots, solution digits as themselves.
        assert!(text.contains(". . ."));
        assert!(text.contains("5 5 5"));
    }
}
