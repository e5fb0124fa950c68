//! Interactive prompts for values missing from the command line.

use std::path::{Path, PathBuf};

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password, Select};

use dormant_core::{AppError, AppResult};
use dormant_domain::Credentials;

const ENTER_PATH_CHOICE: &str = "Enter a path...";

/// Builds credentials, prompting for whichever part is missing.
pub fn credentials(username: Option<String>, password: Option<String>) -> AppResult<Credentials> {
    let theme = ColorfulTheme::default();

    let username = match username.filter(|value| !value.trim().is_empty()) {
        Some(username) => username,
        None => Input::<String>::with_theme(&theme)
            .with_prompt("Username")
            .interact_text()
            .map_err(prompt_error)?,
    };
    let password = match password.filter(|value| !value.is_empty()) {
        Some(password) => password,
        None => Password::with_theme(&theme)
            .with_prompt("Password")
            .interact()
            .map_err(prompt_error)?,
    };

    Credentials::new(username, password)
}

/// Asks for the user export, offering the JSON files found in `directory`.
pub fn json_file(directory: &Path) -> AppResult<PathBuf> {
    let theme = ColorfulTheme::default();
    let candidates = json_files_in(directory)?;

    let chosen = if candidates.is_empty() {
        None
    } else {
        let mut items: Vec<String> = candidates
            .iter()
            .map(|path| path.display().to_string())
            .collect();
        items.push(ENTER_PATH_CHOICE.to_owned());

        let selection = Select::with_theme(&theme)
            .with_prompt("Select the JSON user file")
            .items(&items)
            .default(0)
            .interact_opt()
            .map_err(prompt_error)?
            .ok_or_else(no_file_selected)?;
        candidates.get(selection).cloned()
    };

    match chosen {
        Some(path) => Ok(path),
        None => {
            let entered: String = Input::with_theme(&theme)
                .with_prompt("Path to the JSON user file")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_error)?;
            let entered = entered.trim();
            if entered.is_empty() {
                return Err(no_file_selected());
            }
            Ok(PathBuf::from(entered))
        }
    }
}

/// Lists `*.json` files directly inside `directory`, sorted by name.
fn json_files_in(directory: &Path) -> AppResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(directory).map_err(|error| {
        AppError::Internal(format!(
            "failed to list directory '{}': {error}",
            directory.display()
        ))
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|extension| extension.to_str())
                .is_some_and(|extension| extension.eq_ignore_ascii_case("json"))
        })
        .collect();
    files.sort();
    Ok(files)
}

fn no_file_selected() -> AppError {
    AppError::NotFound("No JSON file specified".to_owned())
}

fn prompt_error(error: dialoguer::Error) -> AppError {
    AppError::Internal(format!("failed to read from the terminal: {error}"))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::json_files_in;

    #[test]
    fn only_json_files_are_offered() {
        let directory =
            tempfile::tempdir().unwrap_or_else(|error| panic!("should create temp dir: {error}"));
        for name in ["b.json", "a.JSON", "notes.txt"] {
            fs::write(directory.path().join(name), "[]")
                .unwrap_or_else(|error| panic!("should write {name}: {error}"));
        }
        fs::create_dir(directory.path().join("nested.json"))
            .unwrap_or_else(|error| panic!("should create dir: {error}"));

        let files = json_files_in(directory.path())
            .unwrap_or_else(|error| panic!("directory should list: {error}"));

        let names: Vec<String> = files
            .iter()
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.JSON".to_owned(), "b.json".to_owned()]);
    }
}
