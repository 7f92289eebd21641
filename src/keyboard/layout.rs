#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutKind {
    Qwertz,
    Qwerty,
}

impl LayoutKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "qwerty" => LayoutKind::Qwerty,
            _ => LayoutKind::Qwertz,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutKind::Qwertz => "qwertz",
            LayoutKind::Qwerty => "qwerty",
        }
    }
}

const QWERTZ_ROWS: &[&[char]] = &[
    &['q', 'w', 'e', 'r', 't', 'z', 'u', 'i', 'o', 'p', 'ü'],
    &['a', 's', 'd', 'f', 'g', 'h', 'j', 'k', 'l', 'ö', 'ä'],
    &['y', 'x', 'c', 'v', 'b', 'n', 'm'],
];

const QWERTY_ROWS: &[&[char]] = &[
    &['q', 'w', 'e', 'r', 't', 'y', 'u', 'i', 'o', 'p'],
    &['a', 's', 'd', 'f', 'g', 'h', 'j', 'k', 'l'],
    &['z', 'x', 'c', 'v', 'b', 'n', 'm'],
];

/// Letter rows for the keyboard diagram, top to bottom.
pub fn rows(kind: LayoutKind) -> &'static [&'static [char]] {
    match kind {
        LayoutKind::Qwertz => QWERTZ_ROWS,
        LayoutKind::Qwerty => QWERTY_ROWS,
    }
}
