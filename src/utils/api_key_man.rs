use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Reads `api_key:` and `api_sec:` lines; missing lines yield empty strings.
pub(crate) fn read_api_credentials_from_file(file_path: &Path) -> io::Result<(String, String)> {
    let file = File::open(file_path)?;
    read_api_credentials(BufReader::new(file))
}

fn read_api_credentials(reader: impl BufRead) -> io::Result<(String, String)> {
    let mut api_key = String::new();
    let mut api_sec = String::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if let Some(key) = line.strip_prefix("api_key:") {
            api_key = key.trim().to_string();
        } else if let Some(sec) = line.strip_prefix("api_sec:") {
            api_sec = sec.trim().to_string();
        }
    }

    Ok((api_key, api_sec))
}
