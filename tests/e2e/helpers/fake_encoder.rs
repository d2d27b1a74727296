use std::path::{Path, PathBuf};

/// Bytes the fake encoder writes as its "video"
pub const FAKE_VIDEO: &[u8] = b"\x00\x00\x00\x18ftypisom-fake-video";

/// Marker that makes the fake encoder fail when found in an input file
pub const CORRUPT_MARKER: &str = "CORRUPT";

/// Shell script standing in for ffmpeg.
///
/// It records its argument list in `last-args` next to itself, fails like
/// ffmpeg when any `-i` input contains [`CORRUPT_MARKER`], and otherwise
/// writes [`FAKE_VIDEO`] to the last argument.
const SCRIPT: &str = r#"#!/bin/sh
if [ "$1" = "-version" ]; then
  echo "ffmpeg version fake"
  exit 0
fi
printf '%s\n' "$@" > "$(dirname "$0")/last-args"
prev=""
out=""
for arg in "$@"; do
  if [ "$prev" = "-i" ] && grep -q CORRUPT "$arg"; then
    echo "$arg: Invalid data found when processing input" >&2
    exit 1
  fi
  prev="$arg"
  out="$arg"
done
printf '\000\000\000\030ftypisom-fake-video' > "$out"
"#;

pub fn install(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("ffmpeg");
    std::fs::write(&path, SCRIPT).expect("Failed to write fake encoder");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to make fake encoder executable");
    path
}

/// Arguments of the most recent encode
pub fn last_args(dir: &Path) -> Vec<String> {
    std::fs::read_to_string(dir.join("last-args"))
        .expect("fake encoder was never invoked")
        .lines()
        .map(str::to_string)
        .collect()
}
