//! Rewrite-svg command implementation
//!
//! Prints the prologue plus the rewritten markup on stdout.

use std::io::Read;

use crate::cli::RewriteSvgArgs;
use crate::error::{self, Result};
use crate::markup;

/// Run rewrite-svg command
pub fn run(args: RewriteSvgArgs) -> Result<()> {
    let escaped = read_markup(&args)?;
    let output = markup::rewrite_attribute(&escaped, &args.attr, &args.value)?;
    println!("{output}");
    Ok(())
}

/// Markup from the argument, the file, or stdin, without trailing line breaks
fn read_markup(args: &RewriteSvgArgs) -> Result<String> {
    let raw = match (&args.markup, &args.file) {
        (Some(markup), _) => markup.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .map_err(|e| error::input::read_failed(path.display().to_string(), e))?,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| error::input::read_failed("<stdin>", e))?;
            buf
        }
    };
    Ok(raw.trim_end_matches(['\n', '\r']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{create_temp_dir, write_file};

    #[test]
    fn test_read_markup_from_file_trims_newline() {
        let temp = create_temp_dir();
        let path = write_file(&temp, "icon.txt", "<svg a=\\\"1\\\"/>\n");
        let args = RewriteSvgArgs {
            markup: None,
            file: Some(path),
            attr: "a".to_string(),
            value: "2".to_string(),
        };
        assert_eq!(read_markup(&args).unwrap(), "<svg a=\\\"1\\\"/>");
    }

    #[test]
    fn test_run_rejects_malformed_markup() {
        let args = RewriteSvgArgs {
            markup: Some("<svg><g></svg>".to_string()),
            file: None,
            attr: "a".to_string(),
            value: "b".to_string(),
        };
        assert!(run(args).is_err());
    }
}
