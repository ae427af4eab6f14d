use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor};

use crate::catalog::ColorTable;
use crate::color::Color;
use crate::corpus::{ColorInput, ColorKind};
use crate::pipeline::assign::Assignment;

/// Print one truecolor line per group: a keycap swatch with its legend drawn on top,
/// followed by the body and legend values.
pub fn render(assignment: &Assignment, table: &ColorTable, out: &mut impl Write) -> io::Result<()> {
    let width = assignment.iter().map(|g| g.id.len()).max().unwrap_or(0);
    for group in assignment.iter() {
        queue!(out, Print(format!("{:<width$}  ", group.id)))?;

        let body = table.rgb(&group.approx);
        let legend = table.rgb(&group.legend);
        match (body, legend) {
            (Some(body), Some(legend)) => queue!(
                out,
                SetBackgroundColor(term_color(body)),
                SetForegroundColor(term_color(legend)),
                Print(" Aa "),
                ResetColor
            )?,
            (Some(body), None) => queue!(
                out,
                SetBackgroundColor(term_color(body)),
                Print(" ?? "),
                ResetColor
            )?,
            _ => queue!(out, Print(" ?? "))?,
        }

        queue!(
            out,
            Print(format!(
                "  body {}  legend {}\n",
                describe(&group.body(), table),
                describe(&group.legend(), table)
            ))
        )?;
    }
    out.flush()
}

fn term_color(color: Color) -> TermColor {
    TermColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Hex colors get their nearest catalog code appended.
fn describe(color: &ColorInput, table: &ColorTable) -> String {
    match color.kind {
        ColorKind::Hex => match table.code_of(&color.value) {
            Some(code) => format!("{} (~{code})", color.value),
            None => color.value.clone(),
        },
        ColorKind::Symbolic => color.value.clone(),
    }
}
