//! User-defined flight data types.
//!
//! Current files keep them in a document-level section:
//!
//! ```xml
//! <datatypes>
//!   <type source="customexpression">
//!     <name>Kinetic energy</name><symbol>Ek</symbol><unit>J</unit>
//!     <expression>0.5*m*Vt^2</expression>
//!   </type>
//! </datatypes>
//! ```
//!
//! Older files repeat them per simulation inside `<customexpressions>`,
//! with the expression text in `<expressionstring>`.

use crate::Result;
use crate::parse::handler::{Built, ElementHandler, Open, unknown_element, warn_unexpected_text};
use crate::parse::{Attributes, LoadContext};
use crate::types::CustomExpression;

/// Add an expression unless one with the same name is already known.
pub(crate) fn add_expression(cx: &mut LoadContext<'_>, expression: CustomExpression) {
    if cx.doc.custom_expression(&expression.name).is_some() {
        log::debug!("custom expression '{}' already defined", expression.name);
        return;
    }
    cx.doc.custom_expressions.push(expression);
}

pub(crate) struct DatatypesHandler;

impl ElementHandler for DatatypesHandler {
    fn open_element(&mut self, cx: &mut LoadContext<'_>, element: &str, attrs: &Attributes) -> Open {
        match (element, attrs.get("source")) {
            ("type", Some("customexpression")) => Open::Delegate(Box::<ExpressionHandler>::default()),
            ("type", source) => {
                log::debug!("skipping data type of source {source:?}");
                Open::Skip
            }
            _ => unknown_element(cx, element),
        }
    }

    fn close_element(
        &mut self,
        cx: &mut LoadContext<'_>,
        element: &str,
        _attrs: &Attributes,
        content: &str,
        built: Built,
    ) -> Result<()> {
        match built {
            Built::Expression(expression) => add_expression(cx, expression),
            _ => warn_unexpected_text(cx, element, content),
        }
        Ok(())
    }
}

/// `<customexpressions>` of a simulation.
#[derive(Default)]
pub(crate) struct LegacyExpressionsHandler {
    expressions: Vec<CustomExpression>,
}

impl ElementHandler for LegacyExpressionsHandler {
    fn open_element(&mut self, cx: &mut LoadContext<'_>, element: &str, _attrs: &Attributes) -> Open {
        match element {
            "expression" => Open::Delegate(Box::<ExpressionHandler>::default()),
            _ => unknown_element(cx, element),
        }
    }

    fn close_element(
        &mut self,
        cx: &mut LoadContext<'_>,
        element: &str,
        _attrs: &Attributes,
        content: &str,
        built: Built,
    ) -> Result<()> {
        match built {
            Built::Expression(expression) => self.expressions.push(expression),
            _ => warn_unexpected_text(cx, element, content),
        }
        Ok(())
    }

    fn end_handler(self: Box<Self>, _cx: &mut LoadContext<'_>, _attrs: &Attributes, _content: &str) -> Result<Built> {
        Ok(Built::Expressions(self.expressions))
    }
}

#[derive(Default)]
struct ExpressionHandler {
    name: Option<String>,
    symbol: Option<String>,
    unit: Option<String>,
    expression: Option<String>,
}

impl ElementHandler for ExpressionHandler {
    fn open_element(&mut self, cx: &mut LoadContext<'_>, element: &str, _attrs: &Attributes) -> Open {
        match element {
            "name" | "symbol" | "unit" | "expression" | "expressionstring" => Open::PlainText,
            _ => unknown_element(cx, element),
        }
    }

    fn close_element(
        &mut self,
        _cx: &mut LoadContext<'_>,
        element: &str,
        _attrs: &Attributes,
        content: &str,
        _built: Built,
    ) -> Result<()> {
        let value = Some(content.to_string());
        match element {
            "name" => self.name = value,
            "symbol" => self.symbol = value,
            "unit" => self.unit = value,
            _ => self.expression = value,
        }
        Ok(())
    }

    fn end_handler(self: Box<Self>, cx: &mut LoadContext<'_>, _attrs: &Attributes, _content: &str) -> Result<Built> {
        let (Some(name), Some(expression)) = (
            self.name.filter(|n| !n.is_empty()),
            self.expression.filter(|e| !e.is_empty()),
        ) else {
            cx.warn("Illegal custom expression, ignoring.");
            return Ok(Built::Nothing);
        };
        Ok(Built::Expression(CustomExpression {
            symbol: self.symbol.unwrap_or_else(|| name.clone()),
            unit: self.unit.unwrap_or_default(),
            name,
            expression,
        }))
    }
}
