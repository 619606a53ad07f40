//! Paint commands replayed by the raster backend.

use crate::rendering::layout::{Align, Rect, SheetLayout};

pub type Color = (u8, u8, u8);

pub const WHITE: Color = (255, 255, 255);
pub const BLACK: Color = (0, 0, 0);
/// Shade behind the header and total rows.
pub const ROW_SHADE: Color = (243, 244, 246);

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    Fill {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        stroke: u32,
        color: Color,
    },
    Text {
        rect: Rect,
        text: String,
        size: u32,
        align: Align,
        bold: bool,
        color: Color,
    },
}

/// Flattens a laid-out sheet into draw order: background, shades, borders,
/// then text.
pub fn display_list(sheet: &SheetLayout, background: Color) -> Vec<PaintCommand> {
    let mut commands =
        Vec::with_capacity(1 + sheet.shaded.len() + sheet.borders.len() + sheet.texts.len());

    commands.push(PaintCommand::Fill {
        rect: Rect {
            x: 0,
            y: 0,
            width: sheet.width,
            height: sheet.height,
        },
        color: background,
    });
    for rect in &sheet.shaded {
        commands.push(PaintCommand::Fill {
            rect: *rect,
            color: ROW_SHADE,
        });
    }
    for (rect, stroke) in &sheet.borders {
        commands.push(PaintCommand::StrokeRect {
            rect: *rect,
            stroke: *stroke,
            color: BLACK,
        });
    }
    for text in &sheet.texts {
        commands.push(PaintCommand::Text {
            rect: text.rect,
            text: text.text.clone(),
            size: text.size,
            align: text.align,
            bold: text.bold,
            color: BLACK,
        });
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::ReceiptRecord;
    use crate::rendering::layout::layout_document;
    use crate::rendering::ReceiptDocument;

    fn commands() -> Vec<PaintCommand> {
        let record = ReceiptRecord::new("9");
        let sheet = layout_document(&ReceiptDocument::from_record(&record));
        display_list(&sheet, WHITE)
    }

    #[test]
    fn background_fill_comes_first_and_covers_the_sheet() {
        let cmds = commands();
        match &cmds[0] {
            PaintCommand::Fill { rect, color } => {
                assert_eq!(*color, WHITE);
                assert_eq!(rect.x, 0);
                assert_eq!(rect.y, 0);
            }
            other => panic!("expected background fill, got {other:?}"),
        }
    }

    #[test]
    fn fills_precede_strokes_which_precede_text() {
        let cmds = commands();
        let last_fill = cmds
            .iter()
            .rposition(|c| matches!(c, PaintCommand::Fill { .. }))
            .unwrap();
        let first_stroke = cmds
            .iter()
            .position(|c| matches!(c, PaintCommand::StrokeRect { .. }))
            .unwrap();
        let first_text = cmds
            .iter()
            .position(|c| matches!(c, PaintCommand::Text { .. }))
            .unwrap();
        assert!(last_fill < first_stroke);
        assert!(first_stroke < first_text);
    }

    #[test]
    fn every_text_command_paints_black() {
        for cmd in commands() {
            if let PaintCommand::Text { color, .. } = cmd {
                assert_eq!(color, BLACK);
            }
        }
    }
}
