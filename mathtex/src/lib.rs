//! Math regions for rich-text editors
//!
//!     This crate lets authors write LaTeX/MathML formulas inside a rich-text editor. Formulas
//!     live in marked spans ("math regions"); the editor shows them typeset by an external
//!     rendering engine, while exported content carries only the plain delimited source.
//!
//!     This is a pure lib, that is, it powers the mathtex CLI and any host adapter but is shell
//!     agnostic: no code here prints, reads env vars or talks to a browser. Hosts supply the
//!     engine and the cursor through the traits in render.rs and host.rs.
//!
//!     The file structure :
//!     .
//!     ├── error.rs        # MathtexError
//!     ├── markup.rs       # Parsed HTML trees (html5ever + rcdom)
//!     ├── marker.rs       # Marker protocol: region identification, delimiters
//!     ├── transform.rs    # internalize / externalize
//!     ├── render.rs       # RenderEngine, RenderScope, refresh
//!     ├── scripts.rs      # Engine script URLs and injection
//!     ├── settings.rs     # PluginSettings
//!     ├── dialog.rs       # Modal and toolbar descriptions, input cleanup
//!     ├── host.rs         # ContentInserter, EditorDocument
//!     ├── session.rs      # Editing session state machine
//!     └── bridge.rs       # MathPlugin: host events to the above
//!
//! Region Shapes
//!
//!     A region is any element carrying the configured class (`math-tex` by default). It is in
//!     one of two shapes:
//!
//!     - Raw: what authors and exported content carry, the delimited source as text:
//!         <span class="math-tex">\(x^2\)</span>
//!     - Rendered: what lives in the editor, exactly two children, the first a scaffold span
//!       the engine typesets, the second a hidden dummy:
//!         <span class="math-tex" contenteditable="false" style="cursor: pointer;"
//!               data-mathinput="\(x^2\)"><span class="math-tex-original">\(x^2\)</span>
//!               <span class="dummy" hidden="hidden">dummy</span></span>
//!
//!     The data attribute is the source of truth for a rendered region. Internalize turns raw
//!     regions into rendered ones, externalize does the reverse, and for delimited sources the
//!     round trip is the identity.
//!
//! Editing
//!
//!     One editing session per editor at a time. A session is opened on an existing region or
//!     for a new one, previews input in its own render scope, and ends committed or cancelled.
//!     See session.rs for the states.
//!
//! Rendering
//!
//!     Rendering is always a full clear and re-typeset of a scope, never incremental. Engines
//!     load asynchronously, so refreshing a scope without an engine is a no-op; the host
//!     triggers a refresh once it attaches one.
//!
pub mod bridge;
pub mod dialog;
pub mod error;
pub mod host;
pub mod marker;
pub mod markup;
pub mod render;
pub mod scripts;
pub mod session;
pub mod settings;
pub mod transform;

pub use bridge::MathPlugin;
pub use dialog::{clean_input, DialogOptions, DialogSpec, ToolbarButton};
pub use error::MathtexError;
pub use host::{ContentInserter, EditorDocument};
pub use marker::{Delimiters, MarkerProtocol, Region, RegionState};
pub use render::{refresh, RefreshOutcome, RenderEngine, RenderScope, ScriptTag};
pub use scripts::EngineScripts;
pub use session::{EditingSession, SessionController, SessionOutcome};
pub use settings::PluginSettings;
pub use transform::{externalize, internalize};
