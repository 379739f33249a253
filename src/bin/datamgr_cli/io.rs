#![deny(clippy::all, clippy::pedantic)]

use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;

use datamgr::domain::form::FormFields;

use crate::args::FormArgs;
use crate::client::CliError;

/// Fields from `--fields-file` first, then each `--field`; later values win.
pub fn read_fields(form: FormArgs) -> Result<FormFields, CliError> {
    let FormArgs {
        fields: pairs,
        fields_file,
    } = form;

    let mut fields = match fields_file {
        Some(path) => {
            let display = path.display().to_string();
            let file = File::open(&path).map_err(|source| CliError::InputFile {
                path: display.clone(),
                source,
            })?;
            FormFields::from_reader(BufReader::new(file)).map_err(|source| {
                CliError::FieldsFile {
                    path: display,
                    source,
                }
            })?
        }
        None => FormFields::new(),
    };

    for pair in &pairs {
        let (name, value) = FormFields::parse_pair(pair)?;
        fields.push(name, value);
    }
    Ok(fields)
}

pub fn read_opt_value(
    val: Option<String>,
    file: Option<PathBuf>,
) -> Result<Option<String>, CliError> {
    if let Some(path) = file {
        let data = fs::read_to_string(&path).map_err(|source| CliError::InputFile {
            path: path.display().to_string(),
            source,
        })?;
        return Ok(Some(data));
    }
    Ok(val)
}
