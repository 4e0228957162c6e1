//! Statement-level grammar
//!
//! One method per statement form. Each consumes its statement completely,
//! including a trailing `;` or block, and leaves the builder cursor where it
//! found it. A syntax error inside a statement is reported and the rest of
//! the statement is skipped; the element stack is unwound on every path.

use super::parser::Parser;
use crate::slax::building::xsl;
use crate::slax::lexing::LexError;
use crate::slax::token::{literal_content, render_compact, Keyword, TokenKind, TokenList};

/// Which statements a block accepts besides the common ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockKind {
    /// Any instruction or element body.
    Plain,
    /// Body of a template: `param`, `mode` and `priority` are allowed too.
    Template,
    /// Argument block of `call` or `apply-templates`: only `with`, and
    /// `mode` when `mode` is set.
    Arguments { mode: bool },
}

impl<'a> Parser<'a> {
    /// Parse a whole stylesheet into the builder.
    pub(crate) fn stylesheet(&mut self) -> Result<(), LexError> {
        if self.at(TokenKind::Keyword(Keyword::Version))? {
            self.version()?;
        }

        while let Some(kind) = self.peek_kind()? {
            if kind == TokenKind::CloseBrace {
                if let Some(token) = self.advance()? {
                    self.error_at(&token, "syntax error, unexpected '}'");
                }
                self.lexer.keywords_on();
                continue;
            }
            self.top_level_statement()?;
        }
        Ok(())
    }

    fn version(&mut self) -> Result<(), LexError> {
        self.advance()?;
        let value = self.collect_value(&[])?;
        let Some(first) = value.first().cloned() else {
            return self.unexpected("a version number");
        };

        let version = render_compact(&value, false);
        if version != xsl::XSL_VERSION {
            let message = format!("unsupported version {}, expecting {}", version, xsl::XSL_VERSION);
            self.error_at(&first, message);
        }
        self.end_statement()
    }

    fn top_level_statement(&mut self) -> Result<(), LexError> {
        let Some(kind) = self.peek_kind()? else {
            return Ok(());
        };

        match kind {
            TokenKind::EndOfStatement => {
                self.advance()?;
                Ok(())
            }
            TokenKind::Less => self.element(),
            TokenKind::Keyword(Keyword::Ns) => self.namespace(),
            TokenKind::Keyword(Keyword::Import) => self.href_statement(xsl::ELT_IMPORT),
            TokenKind::Keyword(Keyword::Include) => self.href_statement(xsl::ELT_INCLUDE),
            TokenKind::Keyword(Keyword::StripSpace) => self.space_statement(xsl::ELT_STRIP_SPACE),
            TokenKind::Keyword(Keyword::PreserveSpace) => {
                self.space_statement(xsl::ELT_PRESERVE_SPACE)
            }
            TokenKind::Keyword(Keyword::Var) => self.variable(xsl::ELT_VARIABLE),
            TokenKind::Keyword(Keyword::Param) => self.variable(xsl::ELT_PARAM),
            TokenKind::Keyword(Keyword::Match) => self.match_template(),
            TokenKind::Keyword(Keyword::Template) => self.named_template(),
            _ => self.unexpected("a top-level statement"),
        }
    }

    /// `ns [prefix [extension|exclude] =] "uri";`
    fn namespace(&mut self) -> Result<(), LexError> {
        self.advance()?;

        let mut prefix = None;
        let mut list_attribute = None;
        if matches!(self.peek_kind()?, Some(TokenKind::Bare)) {
            prefix = self.advance()?.map(|token| token.text);

            if let Some(TokenKind::Bare | TokenKind::Keyword(_)) = self.peek_kind()? {
                let Some(modifier) = self.advance()? else {
                    return Ok(());
                };
                list_attribute = match modifier.text.as_str() {
                    "extension" => Some(xsl::ATT_EXTENSION_ELEMENT_PREFIXES),
                    "exclude" => Some(xsl::ATT_EXCLUDE_RESULT_PREFIXES),
                    _ => {
                        self.error_at(
                            &modifier,
                            "syntax error, expecting 'extension', 'exclude' or '='",
                        );
                        return self.recover();
                    }
                };
            }
            if self.expect(TokenKind::Equals, "'='")?.is_none() {
                return Ok(());
            }
        }

        let Some(uri) = self.expect(TokenKind::Quoted, "a namespace URI")? else {
            return Ok(());
        };
        let uri = literal_content(&uri.text);
        let result = self.builder.add_namespace(prefix.as_deref(), &uri);
        if self.built(result).is_some() {
            if let (Some(attribute), Some(prefix)) = (list_attribute, prefix.as_deref()) {
                let result = self.builder.extend_attribute(attribute, prefix);
                self.built(result);
            }
        }
        self.end_statement()
    }

    /// `import "href";` and `include "href";`
    fn href_statement(&mut self, tag: &'static str) -> Result<(), LexError> {
        self.advance()?;
        let Some(href) = self.expect(TokenKind::Quoted, "a quoted URI")? else {
            return Ok(());
        };
        let href = literal_content(&href.text);
        let result = self.builder.add_element(tag, Some((xsl::ATT_HREF, href.as_str())));
        self.built(result);
        self.end_statement()
    }

    /// `strip-space names;` and `preserve-space names;`
    fn space_statement(&mut self, tag: &'static str) -> Result<(), LexError> {
        self.advance()?;
        let names = self.collect_value(&[])?;
        if names.is_empty() {
            return self.unexpected("element names");
        }
        let result = self.builder.add_element_with_text(tag, xsl::ATT_ELEMENTS, &names);
        self.built(result);
        self.end_statement()
    }

    /// `var $name ...` and `param $name ...`
    ///
    /// A variable whose value is built from content is split so it never
    /// holds a result tree fragment.
    fn variable(&mut self, tag: &'static str) -> Result<(), LexError> {
        self.advance()?;
        let Some(var) = self.expect(TokenKind::Variable, "a variable name")? else {
            return Ok(());
        };
        let name = var.text.trim_start_matches('$');
        let result = self.builder.push_xsl(tag, Some((xsl::ATT_NAME, name)));
        let Some(id) = self.built(result) else {
            return self.recover();
        };

        self.variable_content()?;
        self.close_instruction();

        if tag == xsl::ELT_VARIABLE {
            let result = self.builder.avoid_fragment_result(id);
            self.built(result);
        }
        Ok(())
    }

    /// What follows a variable or `with` name: `;`, `= value;`,
    /// `= <element>` or a block.
    fn variable_content(&mut self) -> Result<(), LexError> {
        match self.peek_kind()? {
            Some(TokenKind::EndOfStatement) => {
                self.advance()?;
                Ok(())
            }
            Some(TokenKind::Equals | TokenKind::Assign) => {
                self.advance()?;
                if self.at(TokenKind::Less)? {
                    return self.element();
                }
                let value = self.collect_value(&[])?;
                if value.is_empty() {
                    return self.unexpected("a value");
                }
                let result = self.builder.add_attribute(xsl::ATT_SELECT, &value);
                self.built(result);
                self.end_statement()
            }
            Some(TokenKind::OpenBrace) => self.block(BlockKind::Plain),
            _ => self.unexpected("'=', '{' or ';'"),
        }
    }

    /// `match pattern { ... }`
    fn match_template(&mut self) -> Result<(), LexError> {
        self.advance()?;
        let pattern = self.collect_value(&[])?;
        if pattern.is_empty() {
            return self.unexpected("a match pattern");
        }
        self.instruction_block(xsl::ELT_TEMPLATE, xsl::ATT_MATCH, &pattern, BlockKind::Template)
    }

    /// `template name(params) { ... }`
    fn named_template(&mut self) -> Result<(), LexError> {
        self.advance()?;
        let Some(name) = self.template_name()? else {
            return Ok(());
        };
        let result = self
            .builder
            .push_xsl(xsl::ELT_TEMPLATE, Some((xsl::ATT_NAME, name.as_str())));
        if self.built(result).is_none() {
            return self.recover();
        }

        if !self.at(TokenKind::OpenParen)? || self.param_list(xsl::ELT_PARAM)? {
            self.block(BlockKind::Template)?;
        }
        self.close_instruction();
        Ok(())
    }

    fn template_name(&mut self) -> Result<Option<String>, LexError> {
        match self.peek_kind()? {
            Some(TokenKind::Bare | TokenKind::FunctionName) => {
                Ok(self.advance()?.map(|token| token.text))
            }
            _ => {
                self.unexpected("a template name")?;
                Ok(None)
            }
        }
    }

    /// `($a, $b = value, ...)` as a run of `tag` elements under the cursor.
    ///
    /// A `with-param` without a value passes the variable of the same name.
    /// Returns false when the list was malformed and the statement has been
    /// skipped.
    fn param_list(&mut self, tag: &'static str) -> Result<bool, LexError> {
        self.advance()?;
        if self.eat(TokenKind::CloseParen)? {
            return Ok(true);
        }

        loop {
            let Some(var) = self.expect(TokenKind::Variable, "a parameter name")? else {
                return Ok(false);
            };
            let value = if self.eat(TokenKind::Equals)? {
                let value = self.collect_value(&[TokenKind::Comma, TokenKind::CloseParen])?;
                if value.is_empty() {
                    self.unexpected("a value")?;
                    return Ok(false);
                }
                value
            } else if tag == xsl::ELT_WITH_PARAM {
                TokenList::single(var.clone())
            } else {
                TokenList::new()
            };
            self.parameter(tag, var.text.trim_start_matches('$'), &value);

            match self.peek_kind()? {
                Some(TokenKind::Comma) => {
                    self.advance()?;
                }
                Some(TokenKind::CloseParen) => {
                    self.advance()?;
                    return Ok(true);
                }
                _ => {
                    self.unexpected("',' or ')'")?;
                    return Ok(false);
                }
            }
        }
    }

    fn parameter(&mut self, tag: &'static str, name: &str, value: &TokenList) {
        let result = self.builder.push_xsl(tag, Some((xsl::ATT_NAME, name)));
        if self.built(result).is_none() {
            return;
        }
        if !value.is_empty() {
            let result = self.builder.add_attribute(xsl::ATT_SELECT, value);
            self.built(result);
        }
        self.close_instruction();
    }

    /// `{ statements }`
    pub(crate) fn block(&mut self, kind: BlockKind) -> Result<(), LexError> {
        if !self.open_block()? {
            return Ok(());
        }

        loop {
            match self.peek_kind()? {
                None => return self.unexpected("'}'"),
                Some(TokenKind::CloseBrace) => {
                    self.advance()?;
                    self.lexer.keywords_on();
                    return Ok(());
                }
                Some(_) => self.statement(kind)?,
            }
        }
    }

    fn statement(&mut self, kind: BlockKind) -> Result<(), LexError> {
        let Some(next) = self.peek_kind()? else {
            return Ok(());
        };
        if let BlockKind::Arguments { mode } = kind {
            return self.argument_statement(next, mode);
        }

        match next {
            TokenKind::EndOfStatement => {
                self.advance()?;
                Ok(())
            }
            TokenKind::Less => self.element(),
            TokenKind::Quoted => self.value_statement(),
            TokenKind::Keyword(keyword) => match keyword {
                Keyword::Param if kind == BlockKind::Template => self.variable(xsl::ELT_PARAM),
                Keyword::Mode if kind == BlockKind::Template => self.mode_statement(),
                Keyword::Priority if kind == BlockKind::Template => self.priority_statement(),
                Keyword::Var => self.variable(xsl::ELT_VARIABLE),
                Keyword::If => self.conditional(),
                Keyword::ForEach => self.for_each(),
                Keyword::ApplyTemplates => self.apply_templates(),
                Keyword::ApplyImports => self.apply_imports(),
                Keyword::Call => self.call_template(),
                Keyword::Expr => {
                    self.advance()?;
                    self.value_statement()
                }
                Keyword::CopyOf => self.copy_of(),
                Keyword::Comment => self.comment_statement(),
                Keyword::Ns => self.namespace(),
                _ => self.unexpected("a statement"),
            },
            _ => self.unexpected("a statement"),
        }
    }

    fn argument_statement(&mut self, next: TokenKind, mode: bool) -> Result<(), LexError> {
        match next {
            TokenKind::EndOfStatement => {
                self.advance()?;
                Ok(())
            }
            TokenKind::Keyword(Keyword::With) => self.with_param(),
            TokenKind::Keyword(Keyword::Mode) if mode => self.mode_statement(),
            _ if mode => self.unexpected("'with' or 'mode'"),
            _ => self.unexpected("'with'"),
        }
    }

    /// `<name attr=value ...>` followed by `;`, a block, a nested element
    /// or a value.
    pub(crate) fn element(&mut self) -> Result<(), LexError> {
        self.advance()?;
        let name = match self.peek_kind()? {
            Some(TokenKind::Bare | TokenKind::Keyword(_)) => self.advance()?,
            _ => None,
        };
        let Some(name) = name else {
            return self.unexpected("an element name");
        };
        let result = self.builder.open(&name.text);
        if self.built(result).is_none() {
            return self.recover();
        }

        loop {
            match self.peek_kind()? {
                Some(TokenKind::Greater) => {
                    self.advance()?;
                    break;
                }
                Some(TokenKind::Bare | TokenKind::Keyword(_)) => {
                    if !self.element_attribute()? {
                        self.close_element();
                        return Ok(());
                    }
                }
                _ => {
                    self.unexpected("an attribute or '>'")?;
                    self.close_element();
                    return Ok(());
                }
            }
        }

        match self.peek_kind()? {
            Some(TokenKind::EndOfStatement) => {
                self.advance()?;
            }
            Some(TokenKind::OpenBrace) => self.block(BlockKind::Plain)?,
            Some(TokenKind::Less) => self.element()?,
            _ => self.value_statement()?,
        }
        self.close_element();
        Ok(())
    }

    fn element_attribute(&mut self) -> Result<bool, LexError> {
        let Some(name) = self.advance()? else {
            return Ok(false);
        };
        if self.expect(TokenKind::Equals, "'='")?.is_none() {
            return Ok(false);
        }
        let Some(value) = self.attribute_value()? else {
            return Ok(false);
        };
        let result = self.builder.add_attribute_value_template(&name.text, &value);
        self.built(result);
        Ok(true)
    }

    /// A value on its own, up to `;`: literal text or `xsl:value-of`.
    fn value_statement(&mut self) -> Result<(), LexError> {
        let value = self.collect_value(&[])?;
        if value.is_empty() {
            return self.unexpected("a value");
        }
        let result = self.builder.add_text_or_value(&value, false);
        self.built(result);
        self.end_statement()
    }

    /// `if test { } else if test { } else { }`
    ///
    /// Built as `xsl:choose`, which collapses to `xsl:if` when there is
    /// only the one branch.
    fn conditional(&mut self) -> Result<(), LexError> {
        self.advance()?;
        let result = self.builder.push_xsl(xsl::ELT_CHOOSE, None);
        let Some(choose) = self.built(result) else {
            return self.recover();
        };

        self.when_branch()?;
        while self.eat(TokenKind::Keyword(Keyword::Else))? {
            if self.eat(TokenKind::Keyword(Keyword::If))? {
                self.when_branch()?;
                continue;
            }
            let result = self.builder.push_xsl(xsl::ELT_OTHERWISE, None);
            if self.built(result).is_some() {
                self.block(BlockKind::Plain)?;
                self.close_instruction();
            } else {
                self.recover()?;
            }
            break;
        }

        self.close_instruction();
        self.builder.simplify_conditional(choose);
        Ok(())
    }

    fn when_branch(&mut self) -> Result<(), LexError> {
        let Some(test) = self.condition("a test expression")? else {
            return Ok(());
        };
        self.instruction_block(xsl::ELT_WHEN, xsl::ATT_TEST, &test, BlockKind::Plain)
    }

    /// `for-each select { ... }`
    fn for_each(&mut self) -> Result<(), LexError> {
        self.advance()?;
        let Some(select) = self.condition("a select expression")? else {
            return Ok(());
        };
        self.instruction_block(xsl::ELT_FOR_EACH, xsl::ATT_SELECT, &select, BlockKind::Plain)
    }

    /// An instruction with one expression attribute and a body.
    fn instruction_block(
        &mut self,
        tag: &'static str,
        attribute: &'static str,
        value: &TokenList,
        kind: BlockKind,
    ) -> Result<(), LexError> {
        let result = self.builder.push_xsl(tag, None);
        if self.built(result).is_none() {
            return self.recover();
        }
        let result = self.builder.add_attribute(attribute, value);
        self.built(result);
        self.block(kind)?;
        self.close_instruction();
        Ok(())
    }

    /// `apply-templates [select] (; | { with ...; mode ...; })`
    fn apply_templates(&mut self) -> Result<(), LexError> {
        self.advance()?;
        let select = self.collect_value(&[])?;
        let result = self.builder.push_xsl(xsl::ELT_APPLY_TEMPLATES, None);
        if self.built(result).is_none() {
            return self.recover();
        }
        if !select.is_empty() {
            let result = self.builder.add_attribute(xsl::ATT_SELECT, &select);
            self.built(result);
        }

        if self.at(TokenKind::OpenBrace)? {
            self.block(BlockKind::Arguments { mode: true })?;
        } else {
            self.end_statement()?;
        }
        self.close_instruction();
        Ok(())
    }

    fn apply_imports(&mut self) -> Result<(), LexError> {
        self.advance()?;
        let result = self.builder.add_element(xsl::ELT_APPLY_IMPORTS, None);
        self.built(result);
        self.end_statement()
    }

    /// `call name[(args)] (; | { with ...; })`
    fn call_template(&mut self) -> Result<(), LexError> {
        self.advance()?;
        let Some(name) = self.template_name()? else {
            return Ok(());
        };
        let result = self
            .builder
            .push_xsl(xsl::ELT_CALL_TEMPLATE, Some((xsl::ATT_NAME, name.as_str())));
        if self.built(result).is_none() {
            return self.recover();
        }

        if !self.at(TokenKind::OpenParen)? || self.param_list(xsl::ELT_WITH_PARAM)? {
            if self.at(TokenKind::OpenBrace)? {
                self.block(BlockKind::Arguments { mode: false })?;
            } else {
                self.end_statement()?;
            }
        }
        self.close_instruction();
        Ok(())
    }

    /// `with $name [= value | { ... }];`
    fn with_param(&mut self) -> Result<(), LexError> {
        self.advance()?;
        let Some(var) = self.expect(TokenKind::Variable, "a parameter name")? else {
            return Ok(());
        };
        let name = var.text.trim_start_matches('$');
        let result = self
            .builder
            .push_xsl(xsl::ELT_WITH_PARAM, Some((xsl::ATT_NAME, name)));
        if self.built(result).is_none() {
            return self.recover();
        }

        if self.at(TokenKind::EndOfStatement)? {
            let result = self
                .builder
                .add_attribute(xsl::ATT_SELECT, &TokenList::single(var.clone()));
            self.built(result);
            self.advance()?;
        } else {
            self.variable_content()?;
        }
        self.close_instruction();
        Ok(())
    }

    fn mode_statement(&mut self) -> Result<(), LexError> {
        self.advance()?;
        let value = self.collect_value(&[])?;
        if value.is_empty() {
            return self.unexpected("a mode name");
        }
        let result = self.builder.add_attribute_string(xsl::ATT_MODE, &value);
        self.built(result);
        self.end_statement()
    }

    fn priority_statement(&mut self) -> Result<(), LexError> {
        self.advance()?;
        let value = self.collect_value(&[])?;
        if value.is_empty() {
            return self.unexpected("a priority");
        }
        let result = self.builder.add_attribute(xsl::ATT_PRIORITY, &value);
        self.built(result);
        self.end_statement()
    }

    fn copy_of(&mut self) -> Result<(), LexError> {
        self.advance()?;
        let value = self.collect_value(&[])?;
        if value.is_empty() {
            return self.unexpected("a value");
        }
        let result = self.builder.push_xsl(xsl::ELT_COPY_OF, None);
        if self.built(result).is_some() {
            let result = self.builder.add_attribute(xsl::ATT_SELECT, &value);
            self.built(result);
            self.close_instruction();
        }
        self.end_statement()
    }

    fn comment_statement(&mut self) -> Result<(), LexError> {
        self.advance()?;
        let value = self.collect_value(&[])?;
        if value.is_empty() {
            return self.unexpected("a value");
        }
        let result = self.builder.add_comment_statement(&value);
        self.built(result);
        self.end_statement()
    }

    fn end_statement(&mut self) -> Result<(), LexError> {
        self.expect(TokenKind::EndOfStatement, "';'")?;
        Ok(())
    }

    fn close_instruction(&mut self) {
        let result = self.builder.pop();
        self.built(result);
    }

    fn close_element(&mut self) {
        let result = self.builder.close();
        self.built(result);
    }
}
