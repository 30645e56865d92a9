//! Restricted arithmetic grammar over the four scalar inputs `u, v, t, a`.
//!
//! User formulas are tokenized, parsed to an AST and interpreted; the only
//! callable names are a fixed math set, so a formula can never reach outside
//! the evaluator. `compile` keeps the previous good function whenever the new
//! source fails to parse or evaluates non-finite at the canonical test point,
//! which guarantees the geometry pipeline is never fed NaN/Infinity.

use std::fmt;
use std::sync::Arc;

use crate::core::transform::Vec3;

/// Canonical test point used to vet a freshly compiled formula.
pub const TEST_POINT: (f32, f32, f32, f32) = (0.3, 0.7, 0.0, 0.5);

#[derive(Debug, Clone, Copy, PartialEq)]
enum Tok {
    Num(f32),
    Var(Var),
    Func(Func),
    Pi,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LParen,
    RParen,
    Comma,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Var {
    U,
    V,
    T,
    A,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Func {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Pow,
    Sqrt,
    Min,
    Max,
    Abs,
    Floor,
    Exp,
    Log,
}

impl Func {
    fn arity(self) -> usize {
        match self {
            Func::Atan2 | Func::Pow | Func::Min | Func::Max => 2,
            _ => 1,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sin" => Func::Sin,
            "cos" => Func::Cos,
            "tan" => Func::Tan,
            "asin" => Func::Asin,
            "acos" => Func::Acos,
            "atan" => Func::Atan,
            "atan2" => Func::Atan2,
            "pow" => Func::Pow,
            "sqrt" => Func::Sqrt,
            "min" => Func::Min,
            "max" => Func::Max,
            "abs" => Func::Abs,
            "floor" => Func::Floor,
            "exp" => Func::Exp,
            "log" => Func::Log,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone)]
enum Node {
    Num(f32),
    Var(Var),
    Neg(Box<Node>),
    Add(Box<Node>, Box<Node>),
    Sub(Box<Node>, Box<Node>),
    Mul(Box<Node>, Box<Node>),
    Div(Box<Node>, Box<Node>),
    Rem(Box<Node>, Box<Node>),
    Call(Func, Vec<Node>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub pos: usize,
    pub msg: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.msg, self.pos)
    }
}

impl std::error::Error for ParseError {}

fn err<T>(pos: usize, msg: impl Into<String>) -> Result<T, ParseError> {
    Err(ParseError {
        pos,
        msg: msg.into(),
    })
}

fn tokenize(src: &str) -> Result<Vec<(usize, Tok)>, ParseError> {
    let bytes = src.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i] as char;
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                i += 1;
            }
            '+' => {
                out.push((i, Tok::Plus));
                i += 1;
            }
            '-' => {
                out.push((i, Tok::Minus));
                i += 1;
            }
            '*' => {
                out.push((i, Tok::Star));
                i += 1;
            }
            '/' => {
                out.push((i, Tok::Slash));
                i += 1;
            }
            '%' => {
                out.push((i, Tok::Percent));
                i += 1;
            }
            '(' => {
                out.push((i, Tok::LParen));
                i += 1;
            }
            ')' => {
                out.push((i, Tok::RParen));
                i += 1;
            }
            ',' => {
                out.push((i, Tok::Comma));
                i += 1;
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < bytes.len() && matches!(bytes[i] as char, '0'..='9' | '.') {
                    i += 1;
                }
                match src[start..i].parse::<f32>() {
                    Ok(n) => out.push((start, Tok::Num(n))),
                    Err(_) => return err(start, format!("bad number `{}`", &src[start..i])),
                }
            }
            'a'..='z' | 'A'..='Z' | '_' => {
                let start = i;
                while i < bytes.len()
                    && matches!(bytes[i] as char, 'a'..='z' | 'A'..='Z' | '0'..='9' | '_')
                {
                    i += 1;
                }
                let name = &src[start..i];
                let tok = match name {
                    "u" => Tok::Var(Var::U),
                    "v" => Tok::Var(Var::V),
                    "t" => Tok::Var(Var::T),
                    "a" => Tok::Var(Var::A),
                    "pi" | "PI" => Tok::Pi,
                    _ => match Func::from_name(name) {
                        Some(f) => Tok::Func(f),
                        None => return err(start, format!("unknown name `{name}`")),
                    },
                };
                out.push((start, tok));
            }
            _ => return err(i, format!("unexpected character `{c}`")),
        }
    }
    Ok(out)
}

struct Parser<'a> {
    toks: &'a [(usize, Tok)],
    at: usize,
    src_len: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Tok> {
        self.toks.get(self.at).map(|&(_, t)| t)
    }

    fn pos(&self) -> usize {
        self.toks
            .get(self.at)
            .map(|&(p, _)| p)
            .unwrap_or(self.src_len)
    }

    fn bump(&mut self) -> Option<Tok> {
        let t = self.peek();
        if t.is_some() {
            self.at += 1;
        }
        t
    }

    fn expect(&mut self, want: Tok, what: &str) -> Result<(), ParseError> {
        if self.peek() == Some(want) {
            self.at += 1;
            Ok(())
        } else {
            err(self.pos(), format!("expected {what}"))
        }
    }

    // expr := term (('+'|'-') term)*
    fn expr(&mut self) -> Result<Node, ParseError> {
        let mut lhs = self.term()?;
        loop {
            match self.peek() {
                Some(Tok::Plus) => {
                    self.at += 1;
                    lhs = Node::Add(Box::new(lhs), Box::new(self.term()?));
                }
                Some(Tok::Minus) => {
                    self.at += 1;
                    lhs = Node::Sub(Box::new(lhs), Box::new(self.term()?));
                }
                _ => return Ok(lhs),
            }
        }
    }

    // term := unary (('*'|'/'|'%') unary)*
    fn term(&mut self) -> Result<Node, ParseError> {
        let mut lhs = self.unary()?;
        loop {
            match self.peek() {
                Some(Tok::Star) => {
                    self.at += 1;
                    lhs = Node::Mul(Box::new(lhs), Box::new(self.unary()?));
                }
                Some(Tok::Slash) => {
                    self.at += 1;
                    lhs = Node::Div(Box::new(lhs), Box::new(self.unary()?));
                }
                Some(Tok::Percent) => {
                    self.at += 1;
                    lhs = Node::Rem(Box::new(lhs), Box::new(self.unary()?));
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn unary(&mut self) -> Result<Node, ParseError> {
        match self.peek() {
            Some(Tok::Minus) => {
                self.at += 1;
                Ok(Node::Neg(Box::new(self.unary()?)))
            }
            Some(Tok::Plus) => {
                self.at += 1;
                self.unary()
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Node, ParseError> {
        let pos = self.pos();
        match self.bump() {
            Some(Tok::Num(n)) => Ok(Node::Num(n)),
            Some(Tok::Pi) => Ok(Node::Num(std::f32::consts::PI)),
            Some(Tok::Var(v)) => Ok(Node::Var(v)),
            Some(Tok::Func(f)) => {
                self.expect(Tok::LParen, "`(` after function name")?;
                let mut args = vec![self.expr()?];
                while self.peek() == Some(Tok::Comma) {
                    self.at += 1;
                    args.push(self.expr()?);
                }
                self.expect(Tok::RParen, "`)`")?;
                if args.len() != f.arity() {
                    return err(
                        pos,
                        format!("{:?} takes {} argument(s), got {}", f, f.arity(), args.len()),
                    );
                }
                Ok(Node::Call(f, args))
            }
            Some(Tok::LParen) => {
                let inner = self.expr()?;
                self.expect(Tok::RParen, "`)`")?;
                Ok(inner)
            }
            _ => err(pos, "expected a value"),
        }
    }
}

fn eval(node: &Node, u: f32, v: f32, t: f32, a: f32) -> f32 {
    match node {
        Node::Num(n) => *n,
        Node::Var(Var::U) => u,
        Node::Var(Var::V) => v,
        Node::Var(Var::T) => t,
        Node::Var(Var::A) => a,
        Node::Neg(x) => -eval(x, u, v, t, a),
        Node::Add(l, r) => eval(l, u, v, t, a) + eval(r, u, v, t, a),
        Node::Sub(l, r) => eval(l, u, v, t, a) - eval(r, u, v, t, a),
        Node::Mul(l, r) => eval(l, u, v, t, a) * eval(r, u, v, t, a),
        Node::Div(l, r) => eval(l, u, v, t, a) / eval(r, u, v, t, a),
        Node::Rem(l, r) => eval(l, u, v, t, a) % eval(r, u, v, t, a),
        Node::Call(f, args) => {
            let x = eval(&args[0], u, v, t, a);
            match f {
                Func::Sin => x.sin(),
                Func::Cos => x.cos(),
                Func::Tan => x.tan(),
                Func::Asin => x.asin(),
                Func::Acos => x.acos(),
                Func::Atan => x.atan(),
                Func::Sqrt => x.sqrt(),
                Func::Abs => x.abs(),
                Func::Floor => x.floor(),
                Func::Exp => x.exp(),
                Func::Log => x.ln(),
                Func::Atan2 => x.atan2(eval(&args[1], u, v, t, a)),
                Func::Pow => x.powf(eval(&args[1], u, v, t, a)),
                Func::Min => x.min(eval(&args[1], u, v, t, a)),
                Func::Max => x.max(eval(&args[1], u, v, t, a)),
            }
        }
    }
}

/// A parsed, immediately evaluable formula.
#[derive(Debug)]
pub struct CompiledExpr {
    source: String,
    root: Node,
}

impl CompiledExpr {
    pub fn eval(&self, u: f32, v: f32, t: f32, a: f32) -> f32 {
        eval(&self.root, u, v, t, a)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The do-nothing formula, used before any user source has compiled.
    pub fn zero() -> Arc<Self> {
        Arc::new(CompiledExpr {
            source: "0".to_string(),
            root: Node::Num(0.0),
        })
    }
}

/// Parse `source` into a callable formula.
pub fn parse(source: &str) -> Result<CompiledExpr, ParseError> {
    let toks = tokenize(source)?;
    if toks.is_empty() {
        return err(0, "empty expression");
    }
    let mut p = Parser {
        toks: &toks,
        at: 0,
        src_len: source.len(),
    };
    let root = p.expr()?;
    if p.at != toks.len() {
        return err(p.pos(), "trailing input");
    }
    Ok(CompiledExpr {
        source: source.to_string(),
        root,
    })
}

/// Compile `source`, falling back to `previous` on parse failure or a
/// non-finite result at the canonical test point. The returned reference is
/// swapped in whole, so the render loop never observes a partial update.
pub fn compile(source: &str, previous: &Arc<CompiledExpr>) -> Arc<CompiledExpr> {
    match parse(source) {
        Ok(compiled) => {
            let (u, v, t, a) = TEST_POINT;
            if compiled.eval(u, v, t, a).is_finite() {
                Arc::new(compiled)
            } else {
                previous.clone()
            }
        }
        Err(_) => previous.clone(),
    }
}

/// A parametric surface: three formulas sharing the `(u, v, t, a)` inputs.
#[derive(Debug, Clone)]
pub struct EquationSet {
    x: Arc<CompiledExpr>,
    y: Arc<CompiledExpr>,
    z: Arc<CompiledExpr>,
}

impl EquationSet {
    pub fn from_sources(x: &str, y: &str, z: &str) -> Self {
        let zero = CompiledExpr::zero();
        Self {
            x: compile(x, &zero),
            y: compile(y, &zero),
            z: compile(z, &zero),
        }
    }

    /// Recompile any axis whose source text changed; unchanged axes keep
    /// their current function, and bad sources keep the last good one.
    pub fn refresh(&mut self, x: &str, y: &str, z: &str) {
        if self.x.source() != x {
            self.x = compile(x, &self.x);
        }
        if self.y.source() != y {
            self.y = compile(y, &self.y);
        }
        if self.z.source() != z {
            self.z = compile(z, &self.z);
        }
    }

    pub fn eval(&self, u: f32, v: f32, t: f32, a: f32) -> Vec3 {
        Vec3 {
            x: self.x.eval(u, v, t, a),
            y: self.y.eval(u, v, t, a),
            z: self.z.eval(u, v, t, a),
        }
    }
}

/// Named formula triples selectable from the UI. Data, not evaluator logic.
pub struct EquationPreset {
    pub name: &'static str,
    pub x: &'static str,
    pub y: &'static str,
    pub z: &'static str,
}

pub const PRESETS: &[EquationPreset] = &[
    EquationPreset {
        name: "sphere",
        x: "sin(pi*v)*cos(2*pi*u)",
        y: "sin(pi*v)*sin(2*pi*u)",
        z: "cos(pi*v)",
    },
    EquationPreset {
        name: "torus",
        x: "(1+0.4*cos(2*pi*v))*cos(2*pi*u)",
        y: "(1+0.4*cos(2*pi*v))*sin(2*pi*u)",
        z: "0.4*sin(2*pi*v)",
    },
    EquationPreset {
        name: "helix",
        x: "cos(4*pi*u)",
        y: "sin(4*pi*u)",
        z: "2*(v-0.5)",
    },
    EquationPreset {
        name: "lissajous",
        x: "sin(3*2*pi*u + pi/2)",
        y: "sin(4*2*pi*v)",
        z: "sin(5*2*pi*(u+v))",
    },
    EquationPreset {
        name: "torus-knot",
        x: "(2+cos(3*2*pi*u))*cos(2*2*pi*u)",
        y: "(2+cos(3*2*pi*u))*sin(2*2*pi*u)",
        z: "sin(3*2*pi*u)",
    },
    EquationPreset {
        name: "mobius",
        x: "(1+(v-0.5)*cos(0.5*2*pi*u))*cos(2*pi*u)",
        y: "(1+(v-0.5)*cos(0.5*2*pi*u))*sin(2*pi*u)",
        z: "(v-0.5)*sin(0.5*2*pi*u)",
    },
    EquationPreset {
        name: "highway",
        x: "0.8*(v-0.5)",
        y: "0.2*sin(10*(u+v)+t)",
        z: "-u",
    },
];

pub fn preset(name: &str) -> Option<&'static EquationPreset> {
    PRESETS.iter().find(|p| p.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn eval_src(src: &str, u: f32, v: f32, t: f32, a: f32) -> f32 {
        parse(src).expect(src).eval(u, v, t, a)
    }

    #[test]
    fn precedence_and_parens() {
        assert_relative_eq!(eval_src("1+2*3", 0.0, 0.0, 0.0, 0.0), 7.0);
        assert_relative_eq!(eval_src("(1+2)*3", 0.0, 0.0, 0.0, 0.0), 9.0);
        assert_relative_eq!(eval_src("10-4-3", 0.0, 0.0, 0.0, 0.0), 3.0);
        assert_relative_eq!(eval_src("7%4", 0.0, 0.0, 0.0, 0.0), 3.0);
    }

    #[test]
    fn unary_minus_binds_tighter_than_mul_chain() {
        assert_relative_eq!(eval_src("-2*3", 0.0, 0.0, 0.0, 0.0), -6.0);
        assert_relative_eq!(eval_src("2*-3", 0.0, 0.0, 0.0, 0.0), -6.0);
        assert_relative_eq!(eval_src("--5", 0.0, 0.0, 0.0, 0.0), 5.0);
    }

    #[test]
    fn variables_bind() {
        assert_relative_eq!(eval_src("u+2*v+t+a", 1.0, 2.0, 3.0, 4.0), 12.0);
    }

    #[test]
    fn functions_evaluate() {
        assert_relative_eq!(eval_src("sin(pi/2)", 0.0, 0.0, 0.0, 0.0), 1.0);
        assert_relative_eq!(eval_src("pow(2,10)", 0.0, 0.0, 0.0, 0.0), 1024.0);
        assert_relative_eq!(eval_src("min(3,max(1,2))", 0.0, 0.0, 0.0, 0.0), 2.0);
        assert_relative_eq!(eval_src("abs(-4)+sqrt(9)", 0.0, 0.0, 0.0, 0.0), 7.0);
        assert_relative_eq!(eval_src("floor(2.9)", 0.0, 0.0, 0.0, 0.0), 2.0);
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!(parse("window").is_err());
        assert!(parse("u + q").is_err());
        assert!(parse("eval(1)").is_err());
    }

    #[test]
    fn wrong_arity_is_rejected() {
        assert!(parse("sin(1,2)").is_err());
        assert!(parse("pow(2)").is_err());
    }

    #[test]
    fn junk_is_rejected() {
        assert!(parse("").is_err());
        assert!(parse("1 2").is_err());
        assert!(parse("(1").is_err());
        assert!(parse("1..5").is_err());
        assert!(parse("u = 3").is_err());
    }

    #[test]
    fn compile_keeps_previous_on_parse_error() {
        let good = compile("u*2", &CompiledExpr::zero());
        let after = compile("u*", &good);
        assert!(Arc::ptr_eq(&good, &after));
    }

    #[test]
    fn compile_keeps_previous_on_non_finite_test_point() {
        let good = compile("u+v", &CompiledExpr::zero());
        // sqrt of a negative number is NaN at the canonical test point.
        let after = compile("sqrt(0-1)", &good);
        assert!(Arc::ptr_eq(&good, &after));
        // Behaviorally identical to the previous function.
        for &(u, v, t, a) in &[(0.0, 0.0, 0.0, 0.0), (0.25, 0.5, 1.0, 0.3), (1.0, 1.0, 2.0, 0.9)] {
            assert_relative_eq!(after.eval(u, v, t, a), good.eval(u, v, t, a));
        }
    }

    #[test]
    fn division_by_zero_at_test_point_falls_back() {
        let good = compile("1", &CompiledExpr::zero());
        let after = compile("1/(t)", &good); // t = 0 at the test point
        assert!(Arc::ptr_eq(&good, &after));
    }

    #[test]
    fn sphere_preset_sits_on_unit_sphere() {
        let p = preset("sphere").unwrap();
        let eqs = EquationSet::from_sources(p.x, p.y, p.z);
        for i in 0..8 {
            for j in 0..8 {
                let u = i as f32 / 8.0;
                let v = j as f32 / 8.0;
                let pt = eqs.eval(u, v, 1.3, 0.5);
                let r2 = pt.x * pt.x + pt.y * pt.y + pt.z * pt.z;
                assert_relative_eq!(r2, 1.0, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn all_presets_compile_and_are_finite() {
        for p in PRESETS {
            let eqs = EquationSet::from_sources(p.x, p.y, p.z);
            let (u, v, t, a) = TEST_POINT;
            let pt = eqs.eval(u, v, t, a);
            assert!(
                pt.x.is_finite() && pt.y.is_finite() && pt.z.is_finite(),
                "preset {} not finite",
                p.name
            );
        }
    }

    #[test]
    fn refresh_only_recompiles_changed_axes() {
        let mut eqs = EquationSet::from_sources("u", "v", "t");
        let x_before = eqs.x.clone();
        eqs.refresh("u", "v", "a");
        assert!(Arc::ptr_eq(&x_before, &eqs.x));
        assert_relative_eq!(eqs.eval(0.0, 0.0, 0.0, 9.0).z, 9.0);
    }
}
