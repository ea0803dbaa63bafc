//! Installation profile for `install-tl`
//!
//! The profile selects the minimal `infraonly` scheme (just `tlmgr` and its
//! support files); everything else is installed through `tlmgr install`.

use std::path::Path;

/// Path with forward slashes, as `install-tl` expects on every platform
pub fn posix_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Render the profile for an installation rooted at `texdir`
pub fn render_profile(home: &Path, texdir: &Path) -> String {
    let home = posix_path(home);
    let texdir = posix_path(texdir);
    format!(
        "selected_scheme scheme-infraonly
TEXDIR {texdir}
TEXMFCONFIG {home}/.texlive/texmf-config
TEXMFHOME {home}/texmf
TEXMFLOCAL {texdir}/texmf-local
TEXMFSYSCONFIG {texdir}/texmf-config
TEXMFSYSVAR {texdir}/texmf-var
TEXMFVAR {home}/.texlive/texmf-var
option_doc 0
option_src 0
"
    )
}
