//! JSON rendering of the syntax tree.
//!
//! Every node becomes `{"nodeType", "text", "line", "children"}` where
//! `children` maps slot names to arrays of child nodes. Empty slots are
//! left out entirely; `children` itself is always present, possibly as an
//! empty object. Slot ordering is stable because the map preserves
//! insertion order.

use serde_json::{json, Map, Value};

use crate::ast::{Block, BlockItem, Expr, IfClause, ReturnStatement, Stat};

/// Render a chunk as a JSON array of statement nodes.
pub fn chunk_to_json(chunk: &[Stat]) -> Value {
    Value::Array(chunk.iter().map(stat_to_json).collect())
}

fn node(node_type: &str, text: &str, line: u32, children: Map<String, Value>) -> Value {
    json!({
        "nodeType": node_type,
        "text": text,
        "line": line,
        "children": children,
    })
}

fn slot(children: &mut Map<String, Value>, name: &str, nodes: Vec<Value>) {
    if !nodes.is_empty() {
        children.insert(name.to_owned(), Value::Array(nodes));
    }
}

fn identifier_node(identifier: &crate::ast::Identifier) -> Value {
    node("Identifier", identifier.name, identifier.line, Map::new())
}

fn stat_to_json(stat: &Stat) -> Value {
    match stat {
        Stat::Local(local) => {
            let mut children = Map::new();
            slot(
                &mut children,
                "variables",
                local.variables.iter().map(identifier_node).collect(),
            );
            slot(
                &mut children,
                "values",
                local.values.iter().map(expr_to_json).collect(),
            );
            node("LocalStatement", "local", local.line, children)
        }
        Stat::Assignment(assignment) => {
            let mut children = Map::new();
            slot(
                &mut children,
                "variables",
                assignment.variables.iter().map(identifier_node).collect(),
            );
            slot(
                &mut children,
                "values",
                assignment.values.iter().map(expr_to_json).collect(),
            );
            node("AssignmentStatement", "assign", assignment.line, children)
        }
        Stat::Return(ret) => return_to_json(ret),
        Stat::If(if_stat) => {
            let mut children = Map::new();
            slot(
                &mut children,
                "clauses",
                if_stat.clauses.iter().map(clause_to_json).collect(),
            );
            node("IfStatement", "if", if_stat.line, children)
        }
        Stat::While(while_stat) => {
            let mut children = Map::new();
            slot(
                &mut children,
                "condition",
                vec![expr_to_json(&while_stat.condition)],
            );
            slot(&mut children, "body", vec![block_to_json(&while_stat.body)]);
            node("WhileStatement", "while", while_stat.line, children)
        }
        Stat::Function(decl) => {
            let mut children = Map::new();
            slot(&mut children, "name", vec![identifier_node(&decl.name)]);
            slot(
                &mut children,
                "params",
                decl.params.iter().map(identifier_node).collect(),
            );
            slot(&mut children, "body", vec![block_to_json(&decl.body)]);
            node("FunctionDeclaration", "function", decl.line, children)
        }
        Stat::Call(call) => {
            let mut children = Map::new();
            slot(
                &mut children,
                "expression",
                vec![expr_to_json(&call.expression)],
            );
            node("CallStatement", "call_stmt", call.line, children)
        }
        Stat::Expr(expr_stat) => {
            let mut children = Map::new();
            slot(
                &mut children,
                "expression",
                vec![expr_to_json(&expr_stat.expression)],
            );
            node("ExpressionStatement", "expr", expr_stat.line, children)
        }
    }
}

fn return_to_json(ret: &ReturnStatement) -> Value {
    let mut children = Map::new();
    slot(
        &mut children,
        "values",
        ret.values.iter().map(expr_to_json).collect(),
    );
    node("ReturnStatement", "return", ret.line, children)
}

fn clause_to_json(clause: &IfClause) -> Value {
    match clause {
        IfClause::If(cond) => {
            let mut children = Map::new();
            slot(&mut children, "condition", vec![expr_to_json(&cond.condition)]);
            slot(&mut children, "body", vec![block_to_json(&cond.body)]);
            node("IfClause", "if", cond.line, children)
        }
        IfClause::ElseIf(cond) => {
            let mut children = Map::new();
            slot(&mut children, "condition", vec![expr_to_json(&cond.condition)]);
            slot(&mut children, "body", vec![block_to_json(&cond.body)]);
            node("ElseifClause", "elseif", cond.line, children)
        }
        IfClause::Else(els) => {
            let mut children = Map::new();
            slot(&mut children, "body", vec![block_to_json(&els.body)]);
            node("ElseClause", "else", els.line, children)
        }
    }
}

fn block_to_json(block: &Block) -> Value {
    let mut children = Map::new();
    slot(
        &mut children,
        "statements",
        block
            .statements
            .iter()
            .map(|item| match item {
                BlockItem::Return(ret) => return_to_json(ret),
                BlockItem::Expr(expr) => expr_to_json(expr),
            })
            .collect(),
    );
    node("Block", block.label, block.line, children)
}

fn expr_to_json(expr: &Expr) -> Value {
    match expr {
        Expr::Number(leaf) => node("NumericLiteral", leaf.text, leaf.line, Map::new()),
        Expr::Str(leaf) => node("StringLiteral", leaf.text, leaf.line, Map::new()),
        Expr::Bool(leaf) => node("BooleanLiteral", leaf.text, leaf.line, Map::new()),
        Expr::Nil(leaf) => node("NilLiteral", leaf.text, leaf.line, Map::new()),
        Expr::Vararg(leaf) => node("VarargLiteral", leaf.text, leaf.line, Map::new()),
        Expr::Name(identifier) => identifier_node(identifier),
        Expr::Unary(unary) => {
            let mut children = Map::new();
            slot(&mut children, "argument", vec![expr_to_json(&unary.argument)]);
            node("UnaryExpression", unary.op, unary.line, children)
        }
        Expr::Binary(binary) => {
            let mut children = Map::new();
            slot(&mut children, "left", vec![expr_to_json(&binary.left)]);
            slot(&mut children, "right", vec![expr_to_json(&binary.right)]);
            node("BinaryExpression", binary.op, binary.line, children)
        }
        Expr::Member(member) => {
            let mut children = Map::new();
            slot(&mut children, "object", vec![expr_to_json(&member.object)]);
            slot(
                &mut children,
                "property",
                vec![identifier_node(&member.property)],
            );
            node("MemberExpression", ".", member.line, children)
        }
        Expr::Index(index) => {
            let mut children = Map::new();
            slot(&mut children, "object", vec![expr_to_json(&index.object)]);
            slot(&mut children, "index", vec![expr_to_json(&index.index)]);
            node("IndexExpression", "[]", index.line, children)
        }
        Expr::Call(call) => {
            let mut children = Map::new();
            slot(&mut children, "callee", vec![expr_to_json(&call.callee)]);
            slot(
                &mut children,
                "arguments",
                call.arguments.iter().map(expr_to_json).collect(),
            );
            node("CallExpression", "call", call.line, children)
        }
        Expr::Table(table) => {
            let mut children = Map::new();
            slot(
                &mut children,
                "fields",
                table
                    .fields
                    .iter()
                    .map(|field| {
                        let mut wrapper = Map::new();
                        slot(&mut wrapper, "value", vec![expr_to_json(&field.value)]);
                        node("TableValue", "", field.line, wrapper)
                    })
                    .collect(),
            );
            node("TableConstructorExpression", "", table.line, children)
        }
        Expr::Function(function) => {
            let mut children = Map::new();
            slot(
                &mut children,
                "params",
                function.params.iter().map(identifier_node).collect(),
            );
            if let Some(body) = &function.body {
                slot(&mut children, "body", vec![block_to_json(body)]);
            }
            node("FunctionExpression", "", function.line, children)
        }
    }
}
