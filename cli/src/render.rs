//! Plain-text rendering for table pages.

use dhriti_console::table::{Align, PageRender};

fn pad(text: &str, width: usize, align: Align) -> String {
    let len = text.chars().count();
    let fill = width.saturating_sub(len);
    match align {
        Align::Left => format!("{text}{}", " ".repeat(fill)),
        Align::Right => format!("{}{text}", " ".repeat(fill)),
    }
}

/// Print a rendered page as an aligned text grid.
pub fn print_table(render: &PageRender) {
    let mut widths: Vec<usize> = render.headers.iter().map(|h| h.chars().count()).collect();
    for row in &render.rows {
        for (i, cell) in row.cells.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let header: Vec<String> = render
        .headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad(h, *w, Align::Left))
        .collect();
    println!("{}", header.join("  "));
    let total_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    println!("{}", "-".repeat(total_width));

    match &render.placeholder {
        Some(placeholder) => println!("{placeholder}"),
        None => {
            for row in &render.rows {
                let cells: Vec<String> = row
                    .cells
                    .iter()
                    .enumerate()
                    .map(|(i, cell)| {
                        let align = render.aligns.get(i).copied().unwrap_or_default();
                        pad(cell, widths[i], align)
                    })
                    .collect();
                println!("{}", cells.join("  "));
            }
        }
    }

    if render.total_pages > 1 {
        println!();
        println!(
            "Page {} of {} ({} rows)",
            render.page, render.total_pages, render.total_rows
        );
    }
}
