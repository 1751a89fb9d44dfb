//! `seqclosure` is a crate for maintaining the transitive closure of
//! pairwise alignment facts across many sequences.
//!
//! Each fact states that position `i` of sequence `x` is aligned with position
//! `j` of sequence `y`. Facts are grouped into alignment sets, where each set
//! holds at most one position per sequence and acts as one column of an
//! implicit multiple alignment. For every set, the [`Engine`](engine::Engine)
//! keeps the tightest bounds that the facts force upon it within every
//! sequence (its [frontier](frontier::Frontier)). Those bounds answer, in
//! constant time:
//!
//! - whether a proposed fact is consistent with everything added so far
//!   ([`Engine::alignable()`](engine::Engine::alignable)),
//! - whether two positions are already aligned
//!   ([`Engine::already_aligned()`](engine::Engine::already_aligned)), and
//! - where, if anywhere, a position may still map within another sequence
//!   ([`Engine::bounds()`](engine::Engine::bounds)).
//!
//! The engine does not decide which positions _should_ be aligned. It only
//! keeps the facts it is given consistent.
//!
//! ## Building an engine
//!
//! An [`Engine`](engine::Engine) is constructed with an
//! [`engine::Builder`], optionally seeded with [anchors](anchor::Anchor).
//! Facts are then added one at a time. Because the unchecked
//! [`Engine::add()`](engine::Engine::add) trusts its caller, most users will
//! want [`Engine::try_add()`](engine::Engine::try_add), which only adds facts
//! that are consistent.
//!
//! ```
//! use seqclosure::bound::Bounds;
//! use seqclosure::engine::Builder;
//!
//! let mut engine = Builder::default()
//!     .lengths([10, 10, 10])?
//!     .push_one_based_anchor(&[1, 1, 1])
//!     .try_build()?;
//!
//! assert!(engine.try_add(0, 5, 1, 4)?);
//! assert!(engine.try_add(1, 4, 2, 6)?);
//!
//! // A fact that crosses an earlier one is rejected.
//! assert!(!engine.try_add(0, 7, 2, 3)?);
//!
//! assert!(engine.already_aligned(0, 5, 2, 6)?);
//! assert_eq!(engine.bounds(0, 3, 2)?, Bounds::Within(1..6));
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Problem files
//!
//! An alignment problem can be persisted as a small, tab-delimited text file
//! and loaded with the [`Reader`] facility.
//!
//! ```
//! let data = b"lengths\t10\t10\nanchor\t0\t0\nalign\t0\t5\t1\t4\n";
//! let mut reader = seqclosure::Reader::new(&data[..]);
//!
//! let problem = reader.read_problem()?;
//! let mut engine = problem.builder()?.try_build()?;
//!
//! for fact in problem.facts() {
//!     engine.try_add_fact(fact)?;
//! }
//!
//! assert_eq!(engine.set_count(), 2);
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod anchor;
pub mod bound;
pub mod engine;
pub mod fact;
pub mod frontier;
pub mod lengths;
pub mod line;
pub mod reader;
pub mod sequence;
pub mod set;
pub mod topology;

pub use engine::Engine;
pub use line::Line;

pub use self::reader::Reader;
