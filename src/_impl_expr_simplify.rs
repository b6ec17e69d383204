use crate::Expr;

impl Expr {
    /// Apply the standard Boolean identities until fixpoint:
    /// unit and absorbing constants, double negation, flattening of nested
    /// conjunctions/disjunctions, operand deduplication, and collapse of
    /// empty or single-operand connectives.
    ///
    /// The result evaluates equal to the input on every valuation, and
    /// `simplify` is idempotent.
    pub fn simplify(&self) -> Expr {
        let mut current = simplify_pass(self);
        loop {
            let next = simplify_pass(&current);
            if next == current {
                return next;
            }
            current = next;
        }
    }
}

/// **(internal)** One bottom-up rewriting pass.
fn simplify_pass(expr: &Expr) -> Expr {
    match expr {
        Expr::Const(_) | Expr::Var(_) => expr.clone(),
        Expr::Not(inner) => match simplify_pass(inner) {
            Expr::Const(value) => Expr::Const(!value),
            Expr::Not(simplified) => *simplified,
            simplified => Expr::mk_not(simplified),
        },
        Expr::And(items) => {
            let mut flat: Vec<Expr> = Vec::new();
            for item in items {
                match simplify_pass(item) {
                    Expr::Const(true) => (),
                    Expr::Const(false) => return Expr::Const(false),
                    Expr::And(nested) => {
                        for operand in nested {
                            if !flat.contains(&operand) {
                                flat.push(operand);
                            }
                        }
                    }
                    operand => {
                        if !flat.contains(&operand) {
                            flat.push(operand);
                        }
                    }
                }
            }
            if flat.is_empty() {
                Expr::Const(true)
            } else if flat.len() == 1 {
                flat.remove(0)
            } else {
                Expr::And(flat)
            }
        }
        Expr::Or(items) => {
            let mut flat: Vec<Expr> = Vec::new();
            for item in items {
                match simplify_pass(item) {
                    Expr::Const(false) => (),
                    Expr::Const(true) => return Expr::Const(true),
                    Expr::Or(nested) => {
                        for operand in nested {
                            if !flat.contains(&operand) {
                                flat.push(operand);
                            }
                        }
                    }
                    operand => {
                        if !flat.contains(&operand) {
                            flat.push(operand);
                        }
                    }
                }
            }
            if flat.is_empty() {
                Expr::Const(false)
            } else if flat.len() == 1 {
                flat.remove(0)
            } else {
                Expr::Or(flat)
            }
        }
    }
}
