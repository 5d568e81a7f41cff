//! Fake yt-dlp executable

use std::path::{Path, PathBuf};

/// Stand-in for yt-dlp covering both search and audio extraction
///
/// - `--flat-playlist ... ytsearch1:<query>` prints an id derived from the query, or nothing
///   when the query mentions "Missing".
/// - Anything else is a download: the `-o` template is filled with the video id as title and
///   "mp3" as extension, the file is written, and its path printed.
const FAKE_YTDLP: &str = r#"#!/bin/sh
last=""
for a in "$@"; do last="$a"; done

case " $* " in
  *" --flat-playlist "*)
    query="${last#ytsearch1:}"
    case "$query" in
      *Missing*) exit 0 ;;
    esac
    printf '%s' "$query" | tr -c 'A-Za-z0-9' '_'
    echo
    ;;
  *)
    out=""
    prev=""
    for a in "$@"; do
      if [ "$prev" = "-o" ]; then out="$a"; fi
      prev="$a"
    done
    id="${last##*=}"
    file=$(printf '%s' "$out" | sed -e "s/%(title)s/$id/" -e 's/%(ext)s/mp3/')
    printf 'audio' > "$file"
    echo "$file"
    ;;
esac
"#;

/// Write the fake yt-dlp into `dir` and return its path
#[cfg(unix)]
pub fn install_fake_ytdlp(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("yt-dlp");
    std::fs::write(&path, FAKE_YTDLP).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// File name the fake produces for a query
pub fn fake_file_name(query: &str) -> String {
    let id: String = query
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{id}.mp3")
}
