use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::{Config, Options};
use crate::error::{Error, Warning};
use crate::rivescript;
use crate::transducer::convert;

const INPUT_EXTENSION: &str = "aiml";
const OUTPUT_EXTENSION: &str = "rive";

/// Result of converting one AIML file.
#[derive(Debug)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub categories: usize,
    pub warnings: Vec<Warning>,
}

/// Converts every AIML file of a directory into RiveScript.
pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        App { config }
    }

    pub fn run(&self) -> Result<Vec<FileReport>, Error> {
        let files = aiml_files(&self.config.input)?;
        self.prepare_output()?;
        let mut reports = Vec::new();
        for file in files {
            let report = self.process(&file)?;
            for warning in &report.warnings {
                warn!(file = %report.input.display(), "{}", warning);
            }
            reports.push(report);
        }
        Ok(reports)
    }

    fn prepare_output(&self) -> Result<(), Error> {
        let output = &self.config.output;
        if output.exists() {
            if !output.is_dir() {
                return Err(Error::OutputNotADirectory(output.clone()));
            }
        } else {
            info!("Creating output directory: {}", output.display());
            fs::create_dir_all(output).map_err(|e| Error::io(output, e))?;
        }
        Ok(())
    }

    fn process(&self, file: &Path) -> Result<FileReport, Error> {
        info!("Processing: {}", file.display());
        let output = self.config.output.join(output_name(file));
        let (text, categories, warnings) = convert_file(file, self.config.options)?;
        fs::write(&output, text).map_err(|e| Error::io(&output, e))?;
        Ok(FileReport {
            input: file.to_path_buf(),
            output,
            categories,
            warnings,
        })
    }
}

/// Convert one AIML file to RiveScript text, returning the text, the number
/// of categories written, and all warnings raised along the way.
pub fn convert_file(
    file: &Path,
    options: Options,
) -> Result<(String, usize, Vec<Warning>), Error> {
    let source = fs::read_to_string(file).map_err(|e| Error::io(file, e))?;
    let conversion = convert(&source, options)?;
    let (text, render_warnings) = rivescript::render(&conversion.parsed);
    let categories = conversion.parsed.len() - render_warnings.len();
    let mut warnings = conversion.warnings;
    warnings.extend(render_warnings);
    Ok((text, categories, warnings))
}

/// The `.aiml` files of a directory (extension matched without regard to
/// case), sorted by path.
pub fn aiml_files(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    if !dir.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        let is_aiml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(INPUT_EXTENSION));
        if is_aiml && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn output_name(file: &Path) -> PathBuf {
    let mut name = file.file_stem().unwrap_or(file.as_os_str()).to_os_string();
    name.push(".");
    name.push(OUTPUT_EXTENSION);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_names() {
        assert_eq!(output_name(Path::new("in/alice.aiml")), PathBuf::from("alice.rive"));
        assert_eq!(output_name(Path::new("in/Std.Bot.AIML")), PathBuf::from("Std.Bot.rive"));
    }

    #[test]
    fn lists_only_aiml_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.aiml"), "<aiml/>").unwrap();
        fs::write(dir.path().join("a.AIML"), "<aiml/>").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("sub.aiml")).unwrap();

        let names: Vec<String> = aiml_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.AIML", "b.aiml"]);
    }

    #[test]
    fn input_must_be_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("x.aiml");
        fs::write(&file, "<aiml/>").unwrap();
        assert!(matches!(aiml_files(&file), Err(Error::NotADirectory(_))));
    }
}
