//! Line-oriented review loop
//!
//! Prints the pair under review and reads one token per line. Image display
//! is left to the reviewer's own viewer; only paths are shown here.

use crate::score_sheet::ScoreSink;
use crate::session::{ReviewSession, SessionStep};
use std::io::{self, BufRead, Write};

const SCORE_HELP: &str = "SCORES: [1 = -2]  [2 = -1]  [3 = 0]  [4 = +1]  [5 = +2]  [d = discard]  [q = quit]";

/// Drive `session` from `input` until it finishes, is stopped, or input ends
pub fn run_console<I, O, S>(
    session: &mut ReviewSession,
    sink: &mut S,
    input: I,
    mut output: O,
) -> io::Result<()>
where
    I: BufRead,
    O: Write,
    S: ScoreSink + ?Sized,
{
    let mut lines = input.lines();

    while let Some(pair) = session.current() {
        if let Some(title) = session.title() {
            writeln!(output, "\n{}", title)?;
        }
        writeln!(
            output,
            "Region: {} ({})",
            pair.metadata.region_label(),
            pair.metadata.hemisphere_label()
        )?;
        writeln!(output, "  Original TIF:    {}", pair.raw.display())?;
        writeln!(output, "  Prediction Mask: {}", pair.mask.display())?;
        writeln!(output, "{}", SCORE_HELP)?;
        write!(output, "> ")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let line = line?;

        match session.handle_input(&line, sink) {
            SessionStep::Recorded(record) => {
                writeln!(output, "Scored {} for {}", record.score, record.filename)?;
            }
            SessionStep::Ignored => {
                writeln!(output, "Unrecognized input '{}'", line.trim())?;
            }
            SessionStep::Stopped | SessionStep::Finished => break,
        }
    }

    if !session.was_stopped() && session.index() >= session.total() {
        writeln!(output, "\nAll images reviewed.")?;
    }

    Ok(())
}
