// src/repair/mod.rs

use anyhow::{Context, Result};
use std::{fs, path::Path};
use tracing::{info, instrument};

pub mod reassemble;
pub mod utils;

pub use reassemble::{reassemble_lines, LineReassembler};

/// Counters for one repair run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairSummary {
    /// Output rows written (one per header line seen).
    pub rows: u64,
    /// Rows reassembled from more than one physical line.
    pub merged: u64,
    /// Continuation lines folded into an address.
    pub continuations: u64,
    /// Lines discarded without contributing to any row.
    pub dropped: u64,
}

/// Read `input` whole, reassemble spilled records, write the corrected rows
/// to `output` in one pass. Rows are rejoined with `;` and terminated with
/// `\n`; the address field of every repaired row comes out fully quoted and
/// free of raw newlines.
#[instrument(level = "info", skip(input, output), fields(input = %input.as_ref().display(), output = %output.as_ref().display()))]
pub fn repair_file<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<RepairSummary> {
    let text = fs::read_to_string(&input)
        .with_context(|| format!("reading input file {:?}", input.as_ref()))?;

    let (rows, summary) = reassemble_lines(&text);

    let mut out = String::with_capacity(text.len());
    for row in &rows {
        out.push_str(row);
        out.push('\n');
    }
    fs::write(&output, out)
        .with_context(|| format!("writing output file {:?}", output.as_ref()))?;

    info!(
        rows = summary.rows,
        merged = summary.merged,
        continuations = summary.continuations,
        dropped = summary.dropped,
        "repair complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,addrfix::repair=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    #[test]
    fn repairs_file_end_to_end() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let input = dir.path().join("products.csv");
        let output = dir.path().join("products_fixed.csv");

        let content = "\
101;12;19.90;Vestido midi;azul;M;SKU-101;Maria Silva;\"Rua das Flores
Bloco B
Porta 12
102;12;24.50;Saia plissada;preto;S;SKU-102;Ana Costa;\"Av. Central 40\"
";
        fs::write(&input, content)?;

        let summary = repair_file(&input, &output)?;
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.merged, 1);
        assert_eq!(summary.continuations, 2);
        assert_eq!(summary.dropped, 0);

        let fixed = fs::read_to_string(&output)?;
        assert_eq!(
            fixed,
            "101;12;19.90;Vestido midi;azul;M;SKU-101;Maria Silva;\"Rua das Flores, Bloco B - Porta 12\"\n\
             102;12;24.50;Saia plissada;preto;S;SKU-102;Ana Costa;\"Av. Central 40\"\n"
        );
        Ok(())
    }

    #[test]
    fn rerunning_on_repaired_output_is_a_no_op() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let input = dir.path().join("broken.csv");
        let once = dir.path().join("fixed_once.csv");
        let twice = dir.path().join("fixed_twice.csv");

        fs::write(
            &input,
            "1;a;b;c;d;e;f;g;\"123 Main St\nSpringfield\n2;a;b;c;d;e;f;g;done\n",
        )?;

        repair_file(&input, &once)?;
        let summary = repair_file(&once, &twice)?;

        assert_eq!(fs::read_to_string(&once)?, fs::read_to_string(&twice)?);
        assert_eq!(summary.merged, 0);
        assert_eq!(summary.dropped, 0);
        Ok(())
    }

    #[test]
    fn missing_input_file_fails_with_path_context() {
        init_test_logging();
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.csv");
        let output = dir.path().join("out.csv");

        let err = repair_file(&missing, &output).unwrap_err();
        assert!(format!("{:#}", err).contains("nope.csv"));
        assert!(!output.exists());
    }
}
