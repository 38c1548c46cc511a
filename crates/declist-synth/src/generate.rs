//! Random symbol tables and decision lists.

use declist_types::{BinOp, DataType, DecisionList, DecisionNode, Expr, SymbolTable, Value};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{SynthConfig, SynthError};

/// A synthesized program: one symbol table and the lists evaluated over it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub symbols: SymbolTable,
    pub lists: Vec<DecisionList>,
}

impl Program {
    /// Nodes across all lists, default nodes included.
    pub fn node_count(&self) -> usize {
        self.lists.iter().map(DecisionList::len).sum()
    }
}

/// A random value of type `ty`.
///
/// Booleans are a coin flip, integers fall in `[0, 10000)`, floats in
/// `[0, 1)`, and strings read `str<k>` with `k` in `[1, 10000]`.
pub fn random_value<R: Rng + ?Sized>(rng: &mut R, ty: DataType) -> Value {
    match ty {
        DataType::Boolean => Value::Boolean(rng.gen()),
        DataType::Integer => Value::Integer(rng.gen_range(0..10_000)),
        DataType::Float => Value::Float(rng.gen()),
        DataType::String => Value::String(format!("str{}", rng.gen_range(1..=10_000))),
    }
}

/// Builds programs according to a [`SynthConfig`].
pub struct Synthesizer {
    config: SynthConfig,
    rng: StdRng,
}

impl Synthesizer {
    /// Validate `config` and seed the generator, from `config.seed` when set.
    pub fn new(config: SynthConfig) -> Result<Self, SynthError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Symbol table and lists in one go.
    pub fn program(&mut self) -> Program {
        let symbols = self.symbol_table();
        let lists = self.decision_lists(&symbols);
        let program = Program { symbols, lists };
        debug!(
            variables = program.symbols.len(),
            lists = program.lists.len(),
            nodes = program.node_count(),
            "synthesized program"
        );
        program
    }

    /// `var1..=varN`, each with a uniformly chosen type and random value.
    pub fn symbol_table(&mut self) -> SymbolTable {
        let rng = &mut self.rng;
        (1..=self.config.variables)
            .map(|i| {
                let ty = DataType::ALL[rng.gen_range(0..DataType::ALL.len())];
                (format!("var{i}"), random_value(&mut *rng, ty))
            })
            .collect()
    }

    /// `config.lists` lists over `symbols`.
    ///
    /// An empty symbol table yields lists holding only a default node.
    pub fn decision_lists(&mut self, symbols: &SymbolTable) -> Vec<DecisionList> {
        let names: Vec<&str> = symbols.names().collect();
        (0..self.config.lists)
            .map(|_| self.decision_list(symbols, &names))
            .collect()
    }

    fn decision_list(&mut self, symbols: &SymbolTable, names: &[&str]) -> DecisionList {
        let length = self.rng.gen_range(1..=self.config.max_list_length);
        let mut guards = Vec::with_capacity(length + 1);
        for _ in 0..length {
            let Some(name) = names.choose(&mut self.rng) else {
                break;
            };
            let Some(value) = symbols.get(name) else {
                continue;
            };
            let condition = self.guard(name, value);
            guards.push(DecisionNode::new(condition, self.rng.gen()));
        }
        DecisionList::with_default(guards, self.rng.gen())
    }

    /// `name op constant` with an operator legal for the variable's type.
    fn guard(&mut self, name: &str, value: &Value) -> Expr {
        let ty = value.data_type();
        let constant = if self.rng.gen_bool(self.config.resolved_constant_ratio) {
            value.clone()
        } else {
            random_value(&mut self.rng, ty)
        };

        let operators = legal_operators(ty, self.config.allow_numeric_logical);
        // Every type admits at least `==`.
        let op = operators.choose(&mut self.rng).copied().unwrap_or(BinOp::Eq);
        Expr::binary(Expr::variable(name), op, Expr::Constant(constant))
    }
}

/// Operators a guard over `ty` may use.
pub fn legal_operators(ty: DataType, allow_numeric_logical: bool) -> Vec<BinOp> {
    BinOp::ALL
        .into_iter()
        .filter(|op| op.is_valid_for(ty))
        .filter(|op| {
            !op.is_logical() || ty == DataType::Boolean || (allow_numeric_logical && ty.is_numeric())
        })
        .collect()
}
