use std::collections::VecDeque;

use crate::fst::Fst;
use crate::symbol::{EPS_ID, EPS_SYM, UNK_SYM};

/// One hypothesis. `prev` and the arena index form the back-pointer forest.
#[derive(Debug, Clone, Copy)]
pub(super) struct Token {
    pub state: u32,
    pub olabel: u32,
    pub cost: f32,
    pub prev: Option<usize>,
    /// Input position consumed by an `<unk>` arc.
    pub capture: Option<usize>,
}

/// Output label and capture of one path step.
pub(super) type PathStep = (u32, Option<usize>);

pub(super) struct Search<'a> {
    fst: &'a Fst,
    beam_size: usize,
    arena: Vec<Token>,
    beam: Vec<usize>,
}

impl<'a> Search<'a> {
    pub fn new(fst: &'a Fst, beam_size: usize) -> Self {
        Self {
            fst,
            beam_size,
            arena: vec![Token {
                state: 0,
                olabel: EPS_ID,
                cost: 0.0,
                prev: None,
                capture: None,
            }],
            beam: vec![0],
        }
    }

    fn push(&mut self, token: Token) -> usize {
        self.arena.push(token);
        self.arena.len() - 1
    }

    pub fn is_exhausted(&self) -> bool {
        self.beam.is_empty()
    }

    pub fn num_tokens(&self) -> usize {
        self.arena.len()
    }

    /// Keep the `beam_size` cheapest tokens. Stable, so equal costs keep
    /// their arrival order.
    pub fn prune(&mut self) {
        let arena = &self.arena;
        self.beam
            .sort_by(|&a, &b| arena[a].cost.total_cmp(&arena[b].cost));
        self.beam.truncate(self.beam_size);
    }

    /// Breadth-first expansion over epsilon-input arcs. Every visited token
    /// stays in the beam, the origin included.
    pub fn epsilon_closure(&mut self) {
        let fst = self.fst;
        let mut queue: VecDeque<usize> = self.beam.drain(..).collect();
        let mut expanded = Vec::with_capacity(queue.len());
        while let Some(idx) = queue.pop_front() {
            expanded.push(idx);
            let Token { state, cost, .. } = self.arena[idx];
            for arc in fst.arcs_by_label(state, EPS_SYM) {
                let next = self.push(Token {
                    state: arc.dest,
                    olabel: arc.olabel,
                    cost: cost + arc.weight,
                    prev: Some(idx),
                    capture: None,
                });
                queue.push_back(next);
            }
        }
        self.beam = expanded;
    }

    /// Advance every token on the escaped input `label` read at `pos`.
    /// Labels missing from the input dictionary follow `<unk>` arcs and
    /// record `pos` as a capture.
    pub fn step(&mut self, pos: usize, label: &str) {
        let fst = self.fst;
        let (key, capture) = if fst.input_id(label).is_some() {
            (label, None)
        } else {
            (UNK_SYM, Some(pos))
        };

        let beam = std::mem::take(&mut self.beam);
        let mut next = Vec::with_capacity(beam.len());
        for idx in beam {
            let Token { state, cost, .. } = self.arena[idx];
            for arc in fst.arcs_by_label(state, key) {
                next.push(self.push(Token {
                    state: arc.dest,
                    olabel: arc.olabel,
                    cost: cost + arc.weight,
                    prev: Some(idx),
                    capture,
                }));
            }
        }
        self.beam = next;
    }

    /// Close over epsilons, keep final states, and return the cheapest
    /// token with its total cost. The first token wins a tie.
    pub fn finalize(&mut self) -> Option<(usize, f32)> {
        self.epsilon_closure();
        let mut best: Option<(usize, f32)> = None;
        for &idx in &self.beam {
            let token = &self.arena[idx];
            let Some(final_weight) = self.fst.final_weight(token.state) else {
                continue;
            };
            let total = token.cost + final_weight;
            if best.map_or(true, |(_, c)| total < c) {
                best = Some((idx, total));
            }
        }
        best
    }

    /// Walk back-pointers from `idx` and return the path in input order,
    /// without the initial token.
    pub fn backtrack(&self, idx: usize) -> Vec<PathStep> {
        let mut path = Vec::new();
        let mut cursor = Some(idx);
        while let Some(i) = cursor {
            let token = &self.arena[i];
            if token.prev.is_some() {
                path.push((token.olabel, token.capture));
            }
            cursor = token.prev;
        }
        path.reverse();
        path
    }
}
