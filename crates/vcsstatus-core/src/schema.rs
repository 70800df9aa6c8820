//! Per-VCS status code tables.

use crate::palette::Accent;
use crate::types::VcsKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCode {
    pub code: char,
    pub glyph: char,
    pub accent: Accent,
    pub meaning: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VcsSchema {
    pub vcs: &'static str,
    /// Characters at the start of a short-status line that hold status codes.
    pub marker_width: usize,
    pub codes: &'static [StatusCode],
}

impl VcsSchema {
    pub fn get(&self, code: char) -> Option<&StatusCode> {
        self.codes.iter().find(|entry| entry.code == code)
    }
}

pub fn schema_for(kind: VcsKind) -> &'static VcsSchema {
    match kind {
        VcsKind::Git => &GIT,
        VcsKind::Mercurial => &MERCURIAL,
    }
}

const fn code(code: char, glyph: char, accent: Accent, meaning: &'static str) -> StatusCode {
    StatusCode {
        code,
        glyph,
        accent,
        meaning,
    }
}

pub static GIT: VcsSchema = VcsSchema {
    vcs: "git",
    marker_width: 2,
    codes: &[
        code('M', 'M', Accent::Green, "modified"),
        code('A', '+', Accent::BrightGreen, "added"),
        code('D', '-', Accent::BrightRed, "deleted"),
        code('R', 'R', Accent::BrightYellow, "renamed"),
        code('C', 'C', Accent::BrightBlue, "copied"),
        code('U', 'U', Accent::BrightMagenta, "updated but unmerged"),
        code('?', '?', Accent::Red, "untracked"),
        code('!', '!', Accent::Cyan, "ignored"),
    ],
};

pub static MERCURIAL: VcsSchema = VcsSchema {
    vcs: "hg",
    marker_width: 1,
    codes: &[
        code('M', 'M', Accent::Green, "modified"),
        code('A', '+', Accent::BrightGreen, "added"),
        code('R', '-', Accent::BrightRed, "removed"),
        code('!', '!', Accent::BrightMagenta, "missing"),
        code('?', '?', Accent::Red, "not tracked"),
        code('I', 'I', Accent::Cyan, "ignored"),
        code('C', 'C', Accent::BrightBlue, "clean"),
    ],
};
