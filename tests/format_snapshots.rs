//! Snapshot tests for the output formats

use slax::parse_str;
use slax::slax::formats::{to_treeviz_str, to_xml_str, FormatRegistry};

const NAMESPACED: &str = "version 1.0;\n\
                          ns foo = \"http://example/foo\";\n\
                          match / {\n    <foo:bar id=\"42\"> \"hello\";\n}\n";

#[test]
fn test_xml_namespaced_template() {
    let tree = parse_str("namespaced.slax", NAMESPACED).unwrap();

    insta::assert_snapshot!(to_xml_str(&tree), @r###"
    <?xml version="1.0"?>
    <xsl:stylesheet xmlns:xsl="http://www.w3.org/1999/XSL/Transform" xmlns:foo="http://example/foo" version="1.0">
      <xsl:template match="/">
        <foo:bar id="42">hello</foo:bar>
      </xsl:template>
    </xsl:stylesheet>
    "###);
}

#[test]
fn test_treeviz_namespaced_template() {
    let tree = parse_str("namespaced.slax", NAMESPACED).unwrap();

    insta::assert_snapshot!(to_treeviz_str(&tree), @r###"
    ◆ xsl:stylesheet version="1.0"
    └─ ◆ xsl:template match="/"
       └─ ◆ foo:bar id="42"
          └─ ◦ hello
    "###);
}

#[test]
fn test_xml_split_variable() {
    let tree = parse_str("split.slax", "var $items {\n    <item> \"a\";\n}\n").unwrap();

    insta::assert_snapshot!(to_xml_str(&tree), @r###"
    <?xml version="1.0"?>
    <xsl:stylesheet xmlns:xsl="http://www.w3.org/1999/XSL/Transform" version="1.0">
      <xsl:variable name="items-temp-1">
        <item>a</item>
      </xsl:variable>
      <xsl:variable xmlns:ext="http://xmlsoft.org/XSLT/namespace" name="items" select="ext:node-set($items-temp-1)"/>
    </xsl:stylesheet>
    "###);
}

#[test]
fn test_xml_conditional_and_escaping() {
    let source = "match item {\n    if $n < 3 {\n        <small> \"a & b\";\n    }\n}\n";
    let tree = parse_str("cond.slax", source).unwrap();

    insta::assert_snapshot!(to_xml_str(&tree), @r###"
    <?xml version="1.0"?>
    <xsl:stylesheet xmlns:xsl="http://www.w3.org/1999/XSL/Transform" version="1.0">
      <xsl:template match="item">
        <xsl:if test="$n &lt; 3">
          <small>a &amp; b</small>
        </xsl:if>
      </xsl:template>
    </xsl:stylesheet>
    "###);
}

#[test]
fn test_registry_indent_applies_to_xml() {
    let tree = parse_str("namespaced.slax", "match / {\n    <out>;\n}\n").unwrap();
    let registry = FormatRegistry::with_indent("\t");

    let xml = registry.serialize(&tree, "xml").unwrap();

    assert!(xml.contains("\n\t<xsl:template match=\"/\">\n\t\t<out/>\n\t</xsl:template>\n"));
}
