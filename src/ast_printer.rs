//! Renders the AST as parenthesised prefix notation, used by `--emit ast`.

use crate::ast::{Expr, FunctionDecl, LiteralValue, Stmt};

pub struct AstPrinter;

impl AstPrinter {
    pub fn print_stmt(&self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::Expression(expr) => format!("(; {})", self.print(expr)),

            Stmt::Print(expr) => format!("(print {})", self.print(expr)),

            Stmt::Var { name, initializer } => match initializer {
                Some(init) => format!("(var {} {})", name.lexeme, self.print(init)),
                None => format!("(var {})", name.lexeme),
            },

            Stmt::Block(statements) => self.block(statements),

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => match else_branch {
                Some(else_branch) => format!(
                    "(if {} {} {})",
                    self.print(condition),
                    self.print_stmt(then_branch),
                    self.print_stmt(else_branch)
                ),
                None => format!(
                    "(if {} {})",
                    self.print(condition),
                    self.print_stmt(then_branch)
                ),
            },

            Stmt::While {
                label,
                condition,
                body,
                increment,
            } => {
                let mut out = String::from("(while");
                if let Some(label) = label {
                    out.push_str(&format!(" {}:", label.lexeme));
                }
                out.push_str(&format!(" {} {}", self.print(condition), self.print_stmt(body)));
                if let Some(inc) = increment {
                    out.push_str(&format!(" {}", self.print(inc)));
                }
                out.push(')');
                out
            }

            Stmt::For { initializer, body } => match initializer {
                Some(init) => format!("(for {} {})", self.print_stmt(init), self.print_stmt(body)),
                None => format!("(for {})", self.print_stmt(body)),
            },

            Stmt::Function(decl) => self.function("fn", decl),

            Stmt::Return { value, .. } => match value {
                Some(value) => format!("(return {})", self.print(value)),
                None => "(return)".to_string(),
            },

            Stmt::Class { name, methods } => {
                let mut out = format!("(class {}", name.lexeme);
                for method in methods {
                    out.push(' ');
                    out.push_str(&self.function("method", method));
                }
                out.push(')');
                out
            }

            Stmt::Break { label, .. } => match label {
                Some(label) => format!("(break {})", label.lexeme),
                None => "(break)".to_string(),
            },

            Stmt::Continue { label, .. } => match label {
                Some(label) => format!("(continue {})", label.lexeme),
                None => "(continue)".to_string(),
            },
        }
    }

    pub fn print(&self, expr: &Expr) -> String {
        match expr {
            Expr::Binary {
                left,
                operator,
                right,
            }
            | Expr::Logical {
                left,
                operator,
                right,
            } => format!(
                "({} {} {})",
                operator.lexeme,
                self.print(left),
                self.print(right)
            ),

            Expr::Unary { operator, right } => {
                format!("({} {})", operator.lexeme, self.print(right))
            }

            Expr::Literal(literal) => match literal {
                LiteralValue::Number(n) => n.to_string(),
                LiteralValue::Str(s) => format!("{:?}", s),
                LiteralValue::True => "true".to_string(),
                LiteralValue::False => "false".to_string(),
                LiteralValue::Nil => "nil".to_string(),
            },

            Expr::Grouping(expr) => format!("(group {})", self.print(expr)),

            Expr::Ternary {
                condition,
                then_branch,
                else_branch,
            } => format!(
                "(?: {} {} {})",
                self.print(condition),
                self.print(then_branch),
                self.print(else_branch)
            ),

            Expr::Variable { name, .. } => name.lexeme.clone(),

            Expr::Assign { name, value, .. } => {
                format!("(= {} {})", name.lexeme, self.print(value))
            }

            Expr::Call {
                callee, arguments, ..
            } => {
                let mut out = format!("(call {}", self.print(callee));
                for arg in arguments {
                    out.push(' ');
                    out.push_str(&self.print(arg));
                }
                out.push(')');
                out
            }

            Expr::Get { object, name } => format!("(. {} {})", self.print(object), name.lexeme),

            Expr::Set {
                object,
                name,
                value,
            } => format!(
                "(= (. {} {}) {})",
                self.print(object),
                name.lexeme,
                self.print(value)
            ),

            Expr::This { .. } => "this".to_string(),
        }
    }

    fn block(&self, statements: &[Stmt]) -> String {
        let mut out = String::from("(block");
        for stmt in statements {
            out.push(' ');
            out.push_str(&self.print_stmt(stmt));
        }
        out.push(')');
        out
    }

    fn function(&self, kind: &str, decl: &FunctionDecl) -> String {
        let params: Vec<&str> = decl.params.iter().map(|p| p.lexeme.as_str()).collect();
        format!(
            "({} {} ({}) {})",
            kind,
            decl.name.lexeme,
            params.join(" "),
            self.block(&decl.body)
        )
    }
}
