//! Minimal VDF (Valve Data Format) reader
//!
//! Enough of the format for `appmanifest_*.acf` and `libraryfolders.vdf`:
//! quoted keys, quoted string values, nested `{}` blocks and `//` comments.

use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq)]
pub enum VdfValue {
    String(String),
    Object(HashMap<String, VdfValue>),
}

impl VdfValue {
    pub fn get(&self, key: &str) -> Option<&VdfValue> {
        match self {
            VdfValue::Object(map) => map.get(key),
            VdfValue::String(_) => None,
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            VdfValue::String(s) => Some(s),
            VdfValue::Object(_) => None,
        }
    }

    pub fn values(&self) -> impl Iterator<Item = &VdfValue> {
        let map = match self {
            VdfValue::Object(map) => Some(map),
            VdfValue::String(_) => None,
        };
        map.into_iter().flat_map(|m| m.values())
    }
}

#[derive(Debug, PartialEq)]
enum Token {
    Str(String),
    Open,
    Close,
}

fn next_token(chars: &mut Peekable<Chars<'_>>) -> Option<Option<Token>> {
    loop {
        match chars.next() {
            None => return Some(None),
            Some(c) if c.is_whitespace() => continue,
            Some('/') if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            Some('{') => return Some(Some(Token::Open)),
            Some('}') => return Some(Some(Token::Close)),
            Some('"') => {
                let mut s = String::new();
                loop {
                    match chars.next()? {
                        '"' => break,
                        '\\' => match chars.next()? {
                            'n' => s.push('\n'),
                            't' => s.push('\t'),
                            other => s.push(other),
                        },
                        c => s.push(c),
                    }
                }
                return Some(Some(Token::Str(s)));
            }
            // Stray characters are skipped
            Some(_) => continue,
        }
    }
}

fn parse_block(chars: &mut Peekable<Chars<'_>>, nested: bool) -> Option<VdfValue> {
    let mut map = HashMap::new();
    loop {
        let key = match next_token(chars)? {
            Some(Token::Str(key)) => key,
            Some(Token::Close) if nested => break,
            None if !nested => break,
            _ => return None,
        };
        let value = match next_token(chars)? {
            Some(Token::Str(s)) => VdfValue::String(s),
            Some(Token::Open) => parse_block(chars, true)?,
            _ => return None,
        };
        map.insert(key, value);
    }
    Some(VdfValue::Object(map))
}

/// Parse a whole VDF document. `None` on malformed input.
pub fn parse_vdf(content: &str) -> Option<VdfValue> {
    parse_block(&mut content.chars().peekable(), false)
}

/// The fields of an `appmanifest_*.acf` this crate needs
#[derive(Debug, Clone)]
pub struct AppManifest {
    pub app_id: String,
    pub install_dir: String,
    pub state_flags: u32,
}

impl AppManifest {
    pub fn from_vdf(content: &str) -> Option<Self> {
        let root = parse_vdf(content)?;
        let state = root.get("AppState")?;
        Some(Self {
            app_id: state.get_str("appid")?.to_string(),
            install_dir: state.get_str("installdir")?.to_string(),
            state_flags: state.get_str("StateFlags").and_then(|s| s.parse().ok()).unwrap_or(0),
        })
    }

    /// Fully installed (StateFlags == 4)
    pub fn is_installed(&self) -> bool {
        self.state_flags == 4
    }
}

/// Library paths listed in `libraryfolders.vdf`
pub fn parse_library_folders(content: &str) -> Vec<String> {
    let Some(root) = parse_vdf(content) else {
        return Vec::new();
    };
    let Some(folders) = root.get("libraryfolders") else {
        return Vec::new();
    };
    folders
        .values()
        .filter_map(|entry| entry.get_str("path"))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_appmanifest() {
        let content = r#"
// written by Steam
"AppState"
{
    "appid"         "1466060"
    "name"          "Tainted Grail: The Fall of Avalon"
    "StateFlags"    "4"
    "installdir"    "Tainted Grail The Fall of Avalon"
    "UserConfig"
    {
        "language"  "english"
    }
}
"#;
        let manifest = AppManifest::from_vdf(content).unwrap();
        assert_eq!(manifest.app_id, "1466060");
        assert_eq!(manifest.install_dir, "Tainted Grail The Fall of Avalon");
        assert!(manifest.is_installed());
    }

    #[test]
    fn test_partial_install_is_not_installed() {
        let content = r#""AppState" { "appid" "1466060" "installdir" "x" "StateFlags" "1026" }"#;
        assert!(!AppManifest::from_vdf(content).unwrap().is_installed());
    }

    #[test]
    fn test_parse_library_folders() {
        let content = r#"
"libraryfolders"
{
    "0"
    {
        "path"      "/home/user/.local/share/Steam"
        "apps" { "1466060" "123" }
    }
    "1"
    {
        "path"      "/mnt/games/SteamLibrary"
    }
}
"#;
        let mut paths = parse_library_folders(content);
        paths.sort();
        assert_eq!(
            paths,
            vec!["/home/user/.local/share/Steam".to_string(), "/mnt/games/SteamLibrary".to_string()]
        );
    }

    #[test]
    fn test_escaped_windows_paths() {
        let content = r#""libraryfolders" { "0" { "path" "D:\\SteamLibrary" } }"#;
        assert_eq!(parse_library_folders(content), vec![r"D:\SteamLibrary".to_string()]);
    }

    #[test]
    fn test_malformed_input() {
        assert!(parse_vdf(r#""AppState" { "appid" "1""#).is_none());
        assert!(parse_library_folders("garbage {").is_empty());
    }
}
