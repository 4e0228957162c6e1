//! End-to-end parses checked with the fluent tree assertions

use slax::slax::building::xsl::{EXT_NS, XSL_NS};
use slax::slax::lexing::tokenize_expression;
use slax::slax::testing::assert_tree;
use slax::slax::token::literal_content;
use slax::{parse_str, ParseFailed};

fn parse(text: &str) -> slax::slax::building::OutputTree {
    match parse_str("scenario.slax", text) {
        Ok(tree) => tree,
        Err(failed) => panic!("{}: {:?}", failed, failed.diagnostics()),
    }
}

#[test]
fn namespaced_literal_element() {
    let tree = parse(
        "version 1.0;\n\
         ns foo = \"http://example/foo\";\n\
         <foo:bar id=\"42\">;\n",
    );

    assert_tree(&tree)
        .xsl("stylesheet")
        .declares(Some("xsl"), XSL_NS)
        .declares(Some("foo"), "http://example/foo")
        .child_count(1)
        .child(0, |bar| {
            bar.element("foo:bar")
                .namespace("http://example/foo")
                .attribute("id", "42")
                .child_count(0);
        });
}

#[test]
fn default_namespace_applies_to_unprefixed_elements() {
    let tree = parse(
        "ns \"http://example/default\";\n\
         match / {\n    <out>;\n}\n",
    );

    assert_tree(&tree)
        .declares(None, "http://example/default")
        .child(0, |template| {
            template.xsl("template").child(0, |out| {
                out.element("out").namespace("http://example/default");
            });
        });
}

#[test]
fn extension_and_exclude_prefixes() {
    let tree = parse(
        "ns func extension = \"http://exslt.org/functions\";\n\
         ns junos exclude = \"http://xml.juniper.net/junos\";\n",
    );

    assert_tree(&tree)
        .declares(Some("func"), "http://exslt.org/functions")
        .declares(Some("junos"), "http://xml.juniper.net/junos")
        .attribute("extension-element-prefixes", "func")
        .attribute("exclude-result-prefixes", "junos");
}

#[test]
fn variable_without_content_keeps_its_select() {
    let tree = parse("var $count = 3;\n");

    assert_tree(&tree).child_count(1).child(0, |var| {
        var.xsl("variable")
            .attribute("name", "count")
            .attribute("select", "3")
            .child_count(0);
    });
}

#[test]
fn variable_with_content_is_split() {
    let tree = parse("var $items {\n    <item> \"a\";\n}\n");

    assert_tree(&tree)
        .child_count(2)
        .child(0, |temp| {
            temp.xsl("variable")
                .attribute("name", "items-temp-1")
                .child_count(1)
                .child(0, |item| {
                    item.element("item").child(0, |text| {
                        text.text("a");
                    });
                });
        })
        .child(1, |var| {
            var.xsl("variable")
                .attribute("name", "items")
                .attribute("select", "ext:node-set($items-temp-1)")
                .declares(Some("ext"), EXT_NS)
                .child_count(0);
        });
}

#[test]
fn variable_assigned_an_element() {
    let tree = parse("match / {\n    var $node = <node> \"x\";\n    copy-of $node;\n}\n");

    assert_tree(&tree).child(0, |template| {
        template
            .child_count(3)
            .child(0, |temp| {
                temp.attribute("name", "node-temp-1").child(0, |node| {
                    node.element("node");
                });
            })
            .child(1, |var| {
                var.attribute("select", "ext:node-set($node-temp-1)");
            })
            .child(2, |copy| {
                copy.xsl("copy-of").attribute("select", "$node");
            });
    });
}

#[test]
fn named_template_and_call() {
    let tree = parse(
        "template greet($name, $greeting = \"hello\") {\n\
         \x20   <p> $greeting _ \" \" _ $name;\n\
         }\n\
         match / {\n\
         \x20   call greet($name = \"world\");\n\
         }\n",
    );

    assert_tree(&tree)
        .child(0, |template| {
            template
                .xsl("template")
                .attribute("name", "greet")
                .child_count(3)
                .child(0, |param| {
                    param.xsl("param").attribute("name", "name").no_attribute("select");
                })
                .child(1, |param| {
                    param
                        .xsl("param")
                        .attribute("name", "greeting")
                        .attribute("select", "\"hello\"");
                })
                .child(2, |p| {
                    p.element("p").child(0, |value| {
                        value
                            .xsl("value-of")
                            .attribute("select", "concat($greeting, \" \", $name)");
                    });
                });
        })
        .child(1, |template| {
            template.attribute("match", "/").child(0, |call| {
                call.xsl("call-template")
                    .attribute("name", "greet")
                    .child(0, |with| {
                        with.xsl("with-param")
                            .attribute("name", "name")
                            .attribute("select", "\"world\"");
                    });
            });
        });
}

#[test]
fn call_with_argument_block() {
    let tree = parse("match / {\n    call show {\n        with $depth = 2;\n        with $item;\n    }\n}\n");

    assert_tree(&tree).child(0, |template| {
        template.child(0, |call| {
            call.xsl("call-template")
                .attribute("name", "show")
                .child_count(2)
                .child(0, |with| {
                    with.attribute("name", "depth").attribute("select", "2");
                })
                .child(1, |with| {
                    with.attribute("name", "item").attribute("select", "$item");
                });
        });
    });
}

#[test]
fn conditional_chain_keeps_choose() {
    let tree = parse(
        "match item {\n\
         \x20   if $a { \"one\"; }\n\
         \x20   else if $b { \"two\"; }\n\
         \x20   else { \"three\"; }\n\
         }\n",
    );

    assert_tree(&tree).child(0, |template| {
        template.child_count(1).child(0, |choose| {
            choose
                .xsl("choose")
                .child_count(3)
                .child(0, |when| {
                    when.xsl("when").attribute("test", "$a");
                })
                .child(1, |when| {
                    when.xsl("when").attribute("test", "$b");
                })
                .child(2, |otherwise| {
                    otherwise.xsl("otherwise").child(0, |text| {
                        text.text("three");
                    });
                });
        });
    });
}

#[test]
fn single_branch_becomes_if() {
    let tree = parse("match item {\n    if ($a) {\n        <yes>;\n    }\n    <after>;\n}\n");

    assert_tree(&tree).child(0, |template| {
        template
            .child_count(2)
            .child(0, |branch| {
                branch.xsl("if").attribute("test", "$a").child(0, |yes| {
                    yes.element("yes");
                });
            })
            .child(1, |after| {
                after.element("after");
            });
    });
}

#[test]
fn for_each_and_apply_templates() {
    let tree = parse(
        "match catalog {\n\
         \x20   for-each (item) {\n\
         \x20       apply-templates . {\n\
         \x20           mode \"detail\";\n\
         \x20           with $limit = 5;\n\
         \x20       }\n\
         \x20   }\n\
         \x20   apply-imports;\n\
         }\n",
    );

    assert_tree(&tree).child(0, |template| {
        template
            .attribute("match", "catalog")
            .child_count(2)
            .child(0, |each| {
                each.xsl("for-each")
                    .attribute("select", "item")
                    .child(0, |apply| {
                        apply
                            .xsl("apply-templates")
                            .attribute("select", ".")
                            .attribute("mode", "detail")
                            .child(0, |with| {
                                with.xsl("with-param").attribute("name", "limit");
                            });
                    });
            })
            .child(1, |imports| {
                imports.xsl("apply-imports");
            });
    });
}

#[test]
fn template_mode_and_priority() {
    let tree = parse("match item {\n    mode \"list\";\n    priority -1;\n    <li> .;\n}\n");

    assert_tree(&tree).child(0, |template| {
        template
            .attribute("match", "item")
            .attribute("mode", "list")
            .attribute("priority", "-1")
            .child(0, |li| {
                li.element("li").child(0, |value| {
                    value.xsl("value-of").attribute("select", ".");
                });
            });
    });
}

#[test]
fn attribute_value_templates() {
    let tree = parse("match / {\n    <a href=$base _ \"/index\" title=\"{x}\">;\n}\n");

    assert_tree(&tree).child(0, |template| {
        template.child(0, |a| {
            a.element("a")
                .attribute("href", "{$base}/index")
                .attribute("title", "{{x}}");
        });
    });
}

#[test]
fn comment_statement_and_source_comments() {
    let tree = parse("/* header */\nmatch / {\n    comment \"generated\";\n}\n");

    assert_tree(&tree)
        .child(0, |header| {
            header.comment(" header ");
        })
        .child(1, |template| {
            template.child(0, |comment| {
                comment.xsl("comment").child(0, |text| {
                    text.text("generated");
                });
            });
        });
}

#[test]
fn padded_text_is_wrapped() {
    let tree = parse("match / {\n    <p> \" padded \";\n}\n");

    assert_tree(&tree).child(0, |template| {
        template.child(0, |p| {
            p.child(0, |wrapper| {
                wrapper.xsl("text").child(0, |text| {
                    text.text(" padded ");
                });
            });
        });
    });
}

#[test]
fn every_error_is_counted() {
    let failed = parse_str(
        "broken.slax",
        "match / {\n    <a> \"x\"\n}\nfoo;\n}\nmatch / { <1x>; }\n",
    )
    .unwrap_err();

    match &failed {
        ParseFailed::Errors { name, count, .. } => {
            assert_eq!(name, "broken.slax");
            assert_eq!(*count, 4);
        }
        other => panic!("expected counted errors, got {:?}", other),
    }
    assert_eq!(failed.diagnostics()[0].line, 3);
    assert!(failed.to_string().ends_with("4 errors detected during parsing"));
}

#[test]
fn unterminated_string_is_reported_and_parsing_ends() {
    let failed = parse_str("open.slax", "match / {\n    \"abc\n").unwrap_err();
    assert!(failed.error_count() >= 1);
    assert!(failed
        .diagnostics()
        .iter()
        .any(|d| d.message == "unterminated string"));
}

#[test]
fn unknown_prefix_is_dropped() {
    let tree = parse("match / {\n    <nope:thing>;\n}\n");

    assert_tree(&tree).child(0, |template| {
        template.child(0, |thing| {
            thing.element("thing").no_namespace();
        });
    });
}

#[test]
fn literal_attribute_keeps_string_content() {
    let literal = r#""say \"hi\"\tnow""#;
    let tree = parse(&format!("<out label={}>;\n", literal));

    let tokens = tokenize_expression(literal).unwrap();
    let expected = literal_content(&tokens.first().unwrap().text);
    assert_eq!(expected, "say \"hi\"\tnow");

    assert_tree(&tree).child(0, |out| {
        out.element("out").attribute("label", &expected);
    });
}
