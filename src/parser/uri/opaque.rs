//! Grammar for scheme-specific URIs without an authority, such as `mailto:`.

use super::chars::{self, PATH, PCHAR, QUERY};

/// Which parts a scheme-specific URI may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OpaqueRules {
    /// Punctuation allowed in the part before `?`.
    pub path: &'static [u8],
    pub query: bool,
    pub fragment: bool,
}

/// `mailto:` addresses exclude `&` and `=` before the header fields.
pub(crate) const MAILTO: OpaqueRules = OpaqueRules {
    path: b"!$'()*+,;:@",
    query: true,
    fragment: false,
};

/// `xmpp:` allows an `//auth` part, query and fragment.
pub(crate) const XMPP: OpaqueRules = OpaqueRules {
    path: PATH,
    query: true,
    fragment: true,
};

pub(crate) const MATRIX: OpaqueRules = OpaqueRules {
    path: PATH,
    query: true,
    fragment: true,
};

pub(crate) const BITCOIN: OpaqueRules = OpaqueRules {
    path: PCHAR,
    query: true,
    fragment: false,
};

pub(crate) const ETHEREUM: OpaqueRules = OpaqueRules {
    path: PATH,
    query: true,
    fragment: false,
};

/// Match the part after `scheme:`, starting at `pos`. Returns the end offset,
/// or `None` if nothing follows the colon.
pub(super) fn match_opaque(text: &str, pos: usize, rules: &OpaqueRules) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut end = chars::scan(text, pos, rules.path);
    if rules.query && bytes.get(end) == Some(&b'?') {
        end = chars::scan(text, end + 1, QUERY);
    }
    if rules.fragment && bytes.get(end) == Some(&b'#') {
        end = chars::scan(text, end + 1, QUERY);
    }
    (end > pos).then_some(end)
}
