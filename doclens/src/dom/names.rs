//! Tag and namespace interning
//!
//!     Every element and attribute name is resolved once, at parse or creation time, into a
//!     [`Tag`]. Tree code then compares integers instead of strings. Names known to the
//!     converters (HTML, the XML namespace and the WordprocessingML subset) have fixed tag
//!     numbers so they can be matched in `match` arms; anything else is assigned a dynamic tag
//!     the first time the document sees it.
//!
//!     The table is per document. Two documents may assign different dynamic tags to the same
//!     name, so tags must never be carried from one document into another without going through
//!     [`NameMap::qualified_name`] and back.

use std::collections::HashMap;

/// Interned (namespace, local name) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(pub u32);

/// Interned namespace URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamespaceId(pub u32);

pub const NULL_NS: NamespaceId = NamespaceId(0);
pub const XML_NS: NamespaceId = NamespaceId(1);
pub const HTML_NS: NamespaceId = NamespaceId(2);
pub const WORD_NS: NamespaceId = NamespaceId(3);

pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";
pub const WORD_NAMESPACE: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const BUILTIN_NAMESPACES: &[(NamespaceId, &str, &str)] = &[
    (NULL_NS, "", ""),
    (XML_NS, XML_NAMESPACE, "xml"),
    (HTML_NS, HTML_NAMESPACE, "html"),
    (WORD_NS, WORD_NAMESPACE, "w"),
];

/// Tags below this value never name an element.
pub const MIN_ELEMENT_TAG: Tag = Tag(10);
const FIRST_DYNAMIC_TAG: u32 = 1000;

macro_rules! builtin_tags {
    ($( $konst:ident = $num:expr, $ns:ident, $name:expr; )*) => {
        $( pub const $konst: Tag = Tag($num); )*

        const BUILTIN_TAGS: &[(Tag, NamespaceId, &str)] = &[
            $( ($konst, $ns, $name), )*
        ];
    };
}

pub const DOCUMENT: Tag = Tag(1);
pub const TEXT: Tag = Tag(2);
pub const COMMENT: Tag = Tag(3);
pub const CDATA: Tag = Tag(4);
pub const PROCESSING_INSTRUCTION: Tag = Tag(5);

builtin_tags! {
    HTML_HTML = 10, HTML_NS, "html";
    HTML_HEAD = 11, HTML_NS, "head";
    HTML_BODY = 12, HTML_NS, "body";
    HTML_TITLE = 13, HTML_NS, "title";
    HTML_STYLE = 14, HTML_NS, "style";
    HTML_META = 15, HTML_NS, "meta";
    HTML_LINK = 16, HTML_NS, "link";
    HTML_P = 20, HTML_NS, "p";
    HTML_H1 = 21, HTML_NS, "h1";
    HTML_H2 = 22, HTML_NS, "h2";
    HTML_H3 = 23, HTML_NS, "h3";
    HTML_H4 = 24, HTML_NS, "h4";
    HTML_H5 = 25, HTML_NS, "h5";
    HTML_H6 = 26, HTML_NS, "h6";
    HTML_SPAN = 30, HTML_NS, "span";
    HTML_A = 31, HTML_NS, "a";
    HTML_B = 32, HTML_NS, "b";
    HTML_STRONG = 33, HTML_NS, "strong";
    HTML_I = 34, HTML_NS, "i";
    HTML_EM = 35, HTML_NS, "em";
    HTML_U = 36, HTML_NS, "u";
    HTML_S = 37, HTML_NS, "s";
    HTML_SUB = 38, HTML_NS, "sub";
    HTML_SUP = 39, HTML_NS, "sup";
    HTML_BR = 40, HTML_NS, "br";
    HTML_IMG = 41, HTML_NS, "img";
    HTML_INS = 42, HTML_NS, "ins";
    HTML_DEL = 43, HTML_NS, "del";
    HTML_DIV = 50, HTML_NS, "div";
    HTML_UL = 51, HTML_NS, "ul";
    HTML_OL = 52, HTML_NS, "ol";
    HTML_LI = 53, HTML_NS, "li";
    HTML_TABLE = 54, HTML_NS, "table";
    HTML_CAPTION = 55, HTML_NS, "caption";
    HTML_THEAD = 56, HTML_NS, "thead";
    HTML_TBODY = 57, HTML_NS, "tbody";
    HTML_TFOOT = 58, HTML_NS, "tfoot";
    HTML_TR = 59, HTML_NS, "tr";
    HTML_TD = 60, HTML_NS, "td";
    HTML_TH = 61, HTML_NS, "th";
    HTML_FIGURE = 62, HTML_NS, "figure";
    HTML_FIGCAPTION = 63, HTML_NS, "figcaption";
    HTML_NAV = 64, HTML_NS, "nav";
    HTML_ARTICLE = 65, HTML_NS, "article";
    HTML_SECTION = 66, HTML_NS, "section";
    HTML_ASIDE = 67, HTML_NS, "aside";
    HTML_HGROUP = 68, HTML_NS, "hgroup";
    HTML_HEADER = 69, HTML_NS, "header";
    HTML_FOOTER = 70, HTML_NS, "footer";
    HTML_ADDRESS = 71, HTML_NS, "address";
    HTML_PRE = 72, HTML_NS, "pre";
    HTML_BLOCKQUOTE = 73, HTML_NS, "blockquote";
    HTML_ID = 100, HTML_NS, "id";
    HTML_CLASS = 101, HTML_NS, "class";
    HTML_HREF = 102, HTML_NS, "href";
    HTML_SRC = 103, HTML_NS, "src";
    HTML_ALT = 104, HTML_NS, "alt";
    HTML_NAME = 105, HTML_NS, "name";

    XML_SPACE = 200, XML_NS, "space";
    XML_LANG = 201, XML_NS, "lang";

    WORD_DOCUMENT = 300, WORD_NS, "document";
    WORD_BODY = 301, WORD_NS, "body";
    WORD_P = 302, WORD_NS, "p";
    WORD_PPR = 303, WORD_NS, "pPr";
    WORD_PSTYLE = 304, WORD_NS, "pStyle";
    WORD_R = 305, WORD_NS, "r";
    WORD_RPR = 306, WORD_NS, "rPr";
    WORD_T = 307, WORD_NS, "t";
    WORD_BR = 308, WORD_NS, "br";
    WORD_TAB = 309, WORD_NS, "tab";
    WORD_B = 310, WORD_NS, "b";
    WORD_I = 311, WORD_NS, "i";
    WORD_U = 312, WORD_NS, "u";
    WORD_STRIKE = 313, WORD_NS, "strike";
    WORD_COLOR = 314, WORD_NS, "color";
    WORD_SZ = 315, WORD_NS, "sz";
    WORD_VERTALIGN = 316, WORD_NS, "vertAlign";
    WORD_HYPERLINK = 317, WORD_NS, "hyperlink";
    WORD_BOOKMARKSTART = 318, WORD_NS, "bookmarkStart";
    WORD_BOOKMARKEND = 319, WORD_NS, "bookmarkEnd";
    WORD_PROOFERR = 320, WORD_NS, "proofErr";
    WORD_TBL = 321, WORD_NS, "tbl";
    WORD_SECTPR = 322, WORD_NS, "sectPr";
    WORD_DELTEXT = 323, WORD_NS, "delText";
    WORD_INS = 324, WORD_NS, "ins";
    WORD_DEL = 325, WORD_NS, "del";
    WORD_VAL = 340, WORD_NS, "val";
    WORD_ANCHOR = 341, WORD_NS, "anchor";
    WORD_TYPE = 342, WORD_NS, "type";
    WORD_ID = 343, WORD_NS, "id";
    WORD_NAME = 344, WORD_NS, "name";
}

/// A namespace known to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceInfo {
    pub uri: String,
    pub prefix: String,
}

/// The name an interned tag stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    pub namespace: NamespaceId,
    pub local_name: String,
}

/// Per-document interning table.
#[derive(Debug, Clone)]
pub struct NameMap {
    namespaces: Vec<NamespaceInfo>,
    namespaces_by_uri: HashMap<String, NamespaceId>,
    tags: HashMap<Tag, TagInfo>,
    tags_by_name: HashMap<(NamespaceId, String), Tag>,
    next_tag: u32,
}

impl NameMap {
    /// Create a table seeded with the builtin namespaces and tags.
    pub fn new() -> Self {
        let mut map = NameMap {
            namespaces: Vec::new(),
            namespaces_by_uri: HashMap::new(),
            tags: HashMap::new(),
            tags_by_name: HashMap::new(),
            next_tag: FIRST_DYNAMIC_TAG,
        };

        for (id, uri, prefix) in BUILTIN_NAMESPACES {
            debug_assert_eq!(id.0 as usize, map.namespaces.len());
            map.namespaces.push(NamespaceInfo {
                uri: uri.to_string(),
                prefix: prefix.to_string(),
            });
            map.namespaces_by_uri.insert(uri.to_string(), *id);
        }

        for (tag, ns, name) in BUILTIN_TAGS {
            map.insert_tag(*tag, *ns, name);
        }

        map
    }

    fn insert_tag(&mut self, tag: Tag, namespace: NamespaceId, local_name: &str) {
        self.tags.insert(
            tag,
            TagInfo {
                namespace,
                local_name: local_name.to_string(),
            },
        );
        self.tags_by_name
            .insert((namespace, local_name.to_string()), tag);
    }

    /// Look up a namespace URI, registering it with `prefix` if it is new.
    pub fn namespace_id(&mut self, uri: &str, prefix: Option<&str>) -> NamespaceId {
        if let Some(id) = self.namespaces_by_uri.get(uri) {
            return *id;
        }
        let id = NamespaceId(self.namespaces.len() as u32);
        let prefix = match prefix {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => format!("ns{}", id.0),
        };
        self.namespaces.push(NamespaceInfo {
            uri: uri.to_string(),
            prefix,
        });
        self.namespaces_by_uri.insert(uri.to_string(), id);
        id
    }

    pub fn lookup_namespace(&self, uri: &str) -> Option<NamespaceId> {
        self.namespaces_by_uri.get(uri).copied()
    }

    pub fn namespace(&self, id: NamespaceId) -> Option<&NamespaceInfo> {
        self.namespaces.get(id.0 as usize)
    }

    /// Intern `local_name` in `namespace`.
    pub fn tag_for(&mut self, namespace: NamespaceId, local_name: &str) -> Tag {
        if let Some(tag) = self.tags_by_name.get(&(namespace, local_name.to_string())) {
            return *tag;
        }
        let tag = Tag(self.next_tag);
        self.next_tag += 1;
        self.insert_tag(tag, namespace, local_name);
        tag
    }

    /// Intern a name given by namespace URI (empty string for no namespace).
    pub fn tag_for_uri(&mut self, uri: &str, prefix: Option<&str>, local_name: &str) -> Tag {
        let ns = self.namespace_id(uri, prefix);
        self.tag_for(ns, local_name)
    }

    pub fn lookup_tag(&self, namespace: NamespaceId, local_name: &str) -> Option<Tag> {
        self.tags_by_name
            .get(&(namespace, local_name.to_string()))
            .copied()
    }

    pub fn tag_info(&self, tag: Tag) -> Option<&TagInfo> {
        self.tags.get(&tag)
    }

    pub fn namespace_of(&self, tag: Tag) -> NamespaceId {
        self.tags.get(&tag).map(|t| t.namespace).unwrap_or(NULL_NS)
    }

    pub fn local_name(&self, tag: Tag) -> &str {
        self.tags
            .get(&tag)
            .map(|t| t.local_name.as_str())
            .unwrap_or("")
    }

    /// `prefix:local`, or just `local` for names without a namespace.
    pub fn qualified_name(&self, tag: Tag) -> String {
        let Some(info) = self.tags.get(&tag) else {
            return format!("#tag{}", tag.0);
        };
        match self.namespace(info.namespace) {
            Some(ns) if !ns.prefix.is_empty() => format!("{}:{}", ns.prefix, info.local_name),
            _ => info.local_name.clone(),
        }
    }

    /// All namespaces other than the null namespace, in registration order.
    pub fn namespaces(&self) -> impl Iterator<Item = (NamespaceId, &NamespaceInfo)> {
        self.namespaces
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, info)| (NamespaceId(i as u32), info))
    }
}

impl Default for NameMap {
    fn default() -> Self {
        Self::new()
    }
}
