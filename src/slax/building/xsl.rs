//! XSLT vocabulary used by the builder

pub const XSL_NS: &str = "http://www.w3.org/1999/XSL/Transform";
pub const XSL_PREFIX: &str = "xsl";
pub const XSL_VERSION: &str = "1.0";

/// Namespace of the `node-set()` extension function.
pub const EXT_NS: &str = "http://xmlsoft.org/XSLT/namespace";
pub const EXT_PREFIX: &str = "ext";

pub const ELT_APPLY_IMPORTS: &str = "apply-imports";
pub const ELT_APPLY_TEMPLATES: &str = "apply-templates";
pub const ELT_ATTRIBUTE: &str = "attribute";
pub const ELT_CALL_TEMPLATE: &str = "call-template";
pub const ELT_CHOOSE: &str = "choose";
pub const ELT_COMMENT: &str = "comment";
pub const ELT_COPY_OF: &str = "copy-of";
pub const ELT_FOR_EACH: &str = "for-each";
pub const ELT_IF: &str = "if";
pub const ELT_IMPORT: &str = "import";
pub const ELT_INCLUDE: &str = "include";
pub const ELT_OTHERWISE: &str = "otherwise";
pub const ELT_PARAM: &str = "param";
pub const ELT_PRESERVE_SPACE: &str = "preserve-space";
pub const ELT_STRIP_SPACE: &str = "strip-space";
pub const ELT_STYLESHEET: &str = "stylesheet";
pub const ELT_TEMPLATE: &str = "template";
pub const ELT_TEXT: &str = "text";
pub const ELT_VALUE_OF: &str = "value-of";
pub const ELT_VARIABLE: &str = "variable";
pub const ELT_WHEN: &str = "when";
pub const ELT_WITH_PARAM: &str = "with-param";

pub const ATT_ELEMENTS: &str = "elements";
pub const ATT_EXCLUDE_RESULT_PREFIXES: &str = "exclude-result-prefixes";
pub const ATT_EXTENSION_ELEMENT_PREFIXES: &str = "extension-element-prefixes";
pub const ATT_HREF: &str = "href";
pub const ATT_MATCH: &str = "match";
pub const ATT_MODE: &str = "mode";
pub const ATT_NAME: &str = "name";
pub const ATT_PRIORITY: &str = "priority";
pub const ATT_SELECT: &str = "select";
pub const ATT_TEST: &str = "test";
pub const ATT_VERSION: &str = "version";
