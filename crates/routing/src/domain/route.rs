//! Routes: connected sequences of pools from an input to an output token.

use {
    crate::domain::{
        eth::{H160, Token},
        pool::{ConcentratedPool, Pool, PoolKind, SimplePool},
    },
    std::fmt,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("route has no pools")]
    Empty,
    #[error("pool at hop {hop} does not trade {token}")]
    Disconnected { hop: usize, token: Box<Token> },
    #[error("{protocol} route cannot contain a {kind:?} pool (hop {hop})")]
    ProtocolMismatch {
        protocol: Protocol,
        kind: PoolKind,
        hop: usize,
    },
    #[error("{0} is not on chain {1}")]
    ChainMismatch(Box<Token>, u64),
    #[error("route ends in {actual} instead of {expected}")]
    OutputMismatch {
        expected: Box<Token>,
        actual: Box<Token>,
    },
}

/// The protocol family a route belongs to. It decides which gas heuristic
/// prices the route and how the route is encoded into call data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Protocol {
    Simple,
    Concentrated,
    Mixed,
}

impl Protocol {
    fn admits(self, kind: PoolKind) -> bool {
        match self {
            Self::Simple => kind == PoolKind::Simple,
            Self::Concentrated => kind == PoolKind::Concentrated,
            Self::Mixed => true,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Simple => "simple",
            Self::Concentrated => "concentrated",
            Self::Mixed => "mixed",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    protocol: Protocol,
    pools: Vec<Pool>,
    /// Wrapped tokens visited by the route, one more than there are pools.
    path: Vec<Token>,
    input: Token,
    output: Token,
}

impl Route {
    pub fn simple(pools: Vec<SimplePool>, input: Token, output: Token) -> Result<Self, Error> {
        let pools = pools.into_iter().map(Pool::Simple).collect();
        Self::new(Protocol::Simple, pools, input, output)
    }

    pub fn concentrated(
        pools: Vec<ConcentratedPool>,
        input: Token,
        output: Token,
    ) -> Result<Self, Error> {
        let pools = pools.into_iter().map(Pool::Concentrated).collect();
        Self::new(Protocol::Concentrated, pools, input, output)
    }

    pub fn mixed(pools: Vec<Pool>, input: Token, output: Token) -> Result<Self, Error> {
        Self::new(Protocol::Mixed, pools, input, output)
    }

    /// Validates that the pools form a path from `input` to `output` (either
    /// of which may be a native marker) and that every pool belongs to the
    /// protocol.
    pub fn new(
        protocol: Protocol,
        pools: Vec<Pool>,
        input: Token,
        output: Token,
    ) -> Result<Self, Error> {
        if pools.is_empty() {
            return Err(Error::Empty);
        }
        if output.chain_id != input.chain_id {
            return Err(Error::ChainMismatch(Box::new(output), input.chain_id));
        }

        let mut path = vec![input.wrapped()];
        for (hop, pool) in pools.iter().enumerate() {
            if !protocol.admits(pool.kind()) {
                return Err(Error::ProtocolMismatch {
                    protocol,
                    kind: pool.kind(),
                    hop,
                });
            }
            let tokens = pool.tokens();
            if tokens.token0().chain_id != input.chain_id {
                return Err(Error::ChainMismatch(
                    Box::new(tokens.token0().clone()),
                    input.chain_id,
                ));
            }
            let current = &path[path.len() - 1];
            let next = tokens.other(current).ok_or_else(|| Error::Disconnected {
                hop,
                token: Box::new(current.clone()),
            })?;
            path.push(next.clone());
        }

        let expected = output.wrapped();
        let actual = &path[path.len() - 1];
        if *actual != expected {
            return Err(Error::OutputMismatch {
                expected: Box::new(expected),
                actual: Box::new(actual.clone()),
            });
        }

        Ok(Self {
            protocol,
            pools,
            path,
            input,
            output,
        })
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn pools(&self) -> &[Pool] {
        &self.pools
    }

    pub fn path(&self) -> &[Token] {
        &self.path
    }

    pub fn input(&self) -> &Token {
        &self.input
    }

    pub fn output(&self) -> &Token {
        &self.output
    }

    pub fn chain_id(&self) -> u64 {
        self.input.chain_id
    }

    /// Number of pools traded through.
    pub fn hops(&self) -> usize {
        self.pools.len()
    }

    pub fn pool_addresses(&self) -> Vec<H160> {
        self.pools.iter().map(Pool::address).collect()
    }

    /// Splits the route into maximal runs of pools of the same kind. Routes
    /// of a single protocol are one section.
    pub fn sections(&self) -> Vec<Section<'_>> {
        let mut sections = Vec::new();
        let mut start = 0;
        for end in 1..=self.pools.len() {
            if end < self.pools.len() && self.pools[end].kind() == self.pools[start].kind() {
                continue;
            }
            let run = &self.pools[start..end];
            let pools = match self.pools[start].kind() {
                PoolKind::Simple => SectionPools::Simple(run.iter().filter_map(Pool::as_simple).collect()),
                PoolKind::Concentrated => SectionPools::Concentrated(
                    run.iter().filter_map(Pool::as_concentrated).collect(),
                ),
            };
            sections.push(Section {
                start,
                pools,
                path: &self.path[start..=end],
            });
            start = end;
        }
        sections
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.protocol, self.input.symbol)?;
        for (pool, token) in self.pools.iter().zip(&self.path[1..]) {
            write!(f, " -> {:?} -> {}", pool.address(), token.symbol)?;
        }
        Ok(())
    }
}

/// A run of same-kind pools inside a route.
#[derive(Clone, Debug)]
pub struct Section<'a> {
    /// Index of the section's first pool within the route.
    pub start: usize,
    pub pools: SectionPools<'a>,
    /// Tokens visited by the section, one more than there are pools.
    pub path: &'a [Token],
}

#[derive(Clone, Debug)]
pub enum SectionPools<'a> {
    Simple(Vec<&'a SimplePool>),
    Concentrated(Vec<&'a ConcentratedPool>),
}

impl Section<'_> {
    pub fn kind(&self) -> PoolKind {
        match self.pools {
            SectionPools::Simple(_) => PoolKind::Simple,
            SectionPools::Concentrated(_) => PoolKind::Concentrated,
        }
    }

    pub fn hops(&self) -> usize {
        self.path.len() - 1
    }
}
