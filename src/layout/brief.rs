use egui::{Pos2, Rect, Vec2};

use super::{LayoutConfig, RowRef};
use crate::model::project::LEADER_SEPARATOR;
use crate::model::ProjectGroup;

/// Merged project cell spanning all rows of one project.
#[derive(Debug, Clone, PartialEq)]
pub struct BriefGroup {
    pub project_id: i64,
    pub name: String,
    /// Leader names, one per line.
    pub leader: String,
    pub first_row: usize,
    pub row_span: usize,
    pub name_rect: Rect,
    pub leader_rect: Rect,
}

/// Per-task text of the brief panel.
#[derive(Debug, Clone, PartialEq)]
pub struct BriefRow {
    pub row: usize,
    pub project_id: i64,
    pub task_id: i64,
    pub describe: String,
    pub member: String,
    pub describe_pos: Pos2,
    pub member_pos: Pos2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BriefGeometry {
    pub width: f32,
    pub height: f32,
    pub groups: Vec<BriefGroup>,
    pub rows: Vec<BriefRow>,
    /// Column dividers followed by group and row separators.
    pub lines: Vec<[Pos2; 2]>,
}

/// Column titles of the brief header with their centered anchors.
pub fn header_labels(config: &LayoutConfig) -> [(Pos2, &'static str); 4] {
    let y = config.cell_height * 1.5;
    let leader_right = config.name_width + config.leader_width;
    [
        (Pos2::new(config.name_width * 0.5, y), "Project"),
        (Pos2::new(config.name_width + config.leader_width * 0.5, y), "Leader"),
        (Pos2::new((leader_right + config.describe_right) * 0.5, y), "Task"),
        (Pos2::new((config.describe_right + config.brief_width) * 0.5, y), "Members"),
    ]
}

/// x positions of the vertical column dividers.
pub fn column_dividers(config: &LayoutConfig) -> [f32; 3] {
    [
        config.name_width + 0.5,
        config.name_width + config.leader_width + 0.5,
        config.describe_right + 0.5,
    ]
}

/// Cut a description to `max` characters, appending "...".
pub fn truncate_describe(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

pub(crate) fn build(projects: &[ProjectGroup], rows: &[RowRef], config: &LayoutConfig) -> BriefGeometry {
    let ch = config.cell_height;
    let height = rows.len() as f32 * ch;
    let leader_right = config.name_width + config.leader_width;
    let describe_x = (leader_right + config.describe_right) * 0.5;
    let member_x = (config.describe_right + config.brief_width) * 0.5;

    let mut groups = Vec::with_capacity(projects.len());
    let mut brief_rows = Vec::with_capacity(rows.len());
    let mut lines: Vec<[Pos2; 2]> = column_dividers(config)
        .iter()
        .map(|&x| [Pos2::new(x, 0.0), Pos2::new(x, height)])
        .collect();

    let mut row = 0usize;
    for project in projects {
        let span = project.row_span();
        let top = row as f32 * ch;
        let group_h = span as f32 * ch;

        groups.push(BriefGroup {
            project_id: project.id,
            name: project.name.clone(),
            leader: project.leader.replace(LEADER_SEPARATOR, "\n"),
            first_row: row,
            row_span: span,
            name_rect: Rect::from_min_size(Pos2::new(0.0, top), Vec2::new(config.name_width, group_h)),
            leader_rect: Rect::from_min_size(
                Pos2::new(config.name_width, top),
                Vec2::new(config.leader_width, group_h),
            ),
        });
        lines.push([
            Pos2::new(0.0, top + group_h + 0.5),
            Pos2::new(leader_right, top + group_h + 0.5),
        ]);

        for task in &project.task_slice {
            debug_assert_eq!(rows.get(row).map(|r| r.task_id), Some(task.id));
            let y = row as f32 * ch;
            brief_rows.push(BriefRow {
                row,
                project_id: project.id,
                task_id: task.id,
                describe: truncate_describe(&task.describe, config.describe_max_chars),
                member: task.member.clone(),
                describe_pos: Pos2::new(describe_x, y + ch * 0.5),
                member_pos: Pos2::new(member_x, y + ch * 0.5),
            });
            lines.push([
                Pos2::new(leader_right, y + ch + 0.5),
                Pos2::new(config.brief_width, y + ch + 0.5),
            ]);
            row += 1;
        }
    }

    BriefGeometry {
        width: config.brief_width,
        height,
        groups,
        rows: brief_rows,
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::flatten_rows;
    use crate::layout::tests::two_projects;

    #[test]
    fn group_cells_span_their_rows() {
        let config = LayoutConfig::default();
        let projects = two_projects();
        let geo = build(&projects, &flatten_rows(&projects), &config);

        assert_eq!(geo.height, 5.0 * config.cell_height);
        let second = &geo.groups[1];
        assert_eq!(second.name_rect.top(), 3.0 * config.cell_height);
        assert_eq!(second.name_rect.height(), 2.0 * config.cell_height);
        assert_eq!(second.leader_rect.left(), config.name_width);
        assert_eq!(geo.groups[0].leader, "Ann\nCid");
    }

    #[test]
    fn task_text_sits_in_row_centers() {
        let config = LayoutConfig::default();
        let projects = two_projects();
        let geo = build(&projects, &flatten_rows(&projects), &config);
        let row = &geo.rows[3];
        assert_eq!(row.task_id, 20);
        assert_eq!(row.describe_pos, Pos2::new(290.0, 3.5 * config.cell_height));
        assert_eq!(row.member_pos.x, 480.0);
        // 3 column dividers + 2 group rules + 5 row rules
        assert_eq!(geo.lines.len(), 10);
    }

    #[test]
    fn long_descriptions_are_cut() {
        assert_eq!(truncate_describe("Short one", 16), "Short one");
        assert_eq!(
            truncate_describe("Implement the quarterly report", 16),
            "Implement the qu..."
        );
        assert_eq!(truncate_describe("实现季度报表导出功能并完成联调测试工作", 4), "实现季度...");
    }
}
