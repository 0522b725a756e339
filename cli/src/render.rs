use std::io::Write;

use geomerge_core::{Presenter, Scene, TokenValue};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum Format {
    /// Character grid with a status line
    #[default]
    Text,
    /// One JSON scene per line
    Json,
}

/// Draws scenes to a terminal or any other writer.
#[derive(Debug)]
pub(crate) struct TermPresenter<W> {
    out: W,
    format: Format,
}

impl<W: Write> TermPresenter<W> {
    pub(crate) fn new(out: W, format: Format) -> Self {
        Self { out, format }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }

    fn write_text(&mut self, scene: &Scene) -> std::io::Result<()> {
        let columns = usize::try_from(scene.visible.columns())
            .unwrap_or(usize::MAX)
            .max(1);
        writeln!(self.out)?;
        for row in scene.cells.chunks(columns) {
            let line: Vec<String> = row
                .iter()
                .map(|cell| {
                    // empty cells out of reach stay blank
                    let glyph = match (cell.value, cell.reachable) {
                        (0, true) => ".".to_string(),
                        (0, false) => String::new(),
                        (value, _) => value.to_string(),
                    };
                    if cell.cell == scene.player_cell {
                        format!("[{glyph:^3}]")
                    } else {
                        format!(" {glyph:^3} ")
                    }
                })
                .collect();
            writeln!(self.out, "{}", line.concat().trim_end())?;
        }
        writeln!(
            self.out,
            "{} | cell {:?} at {}",
            scene.status, scene.player_cell, scene.player
        )?;
        self.out.flush()
    }

    fn write_json(&mut self, scene: &Scene) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.out, scene)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<W: Write> Presenter for TermPresenter<W> {
    fn redraw(&mut self, scene: &Scene) {
        let result = match self.format {
            Format::Text => self.write_text(scene),
            Format::Json => self.write_json(scene),
        };
        if let Err(err) = result {
            log::error!("failed to draw scene: {}", err);
        }
    }

    fn announce_win(&mut self, held: TokenValue) {
        let result = match self.format {
            Format::Text => writeln!(self.out, "*** You made {held}! You win! ***"),
            Format::Json => writeln!(self.out, "{}", serde_json::json!({ "win": held })),
        };
        if let Err(err) = result {
            log::error!("failed to announce win: {}", err);
        }
    }
}
