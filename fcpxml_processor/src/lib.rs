//! # FCPXML Processor: Final Cut Pro Timelines to Motion Projects
//!
//! This crate turns an FCPXML interchange document into an Apple Motion scene
//! document (`.motn`, the `ozml` schema). It works in two steps:
//!
//! - [`parse_fcpxml`]: walks the document once and resolves it into a flat
//!   [`motion_core::Project`] where every clip sits at an absolute timeline
//!   position and every compound-clip reference (`ref-clip`) has been expanded.
//! - [`generate_motion`]: turns that project into the Motion document, with
//!   frame-quantized timings, node ids, audio tracks and footage entries.
//!
//! ## Limitations
//!
//! Whether a clip carries audio is decided from the file extension of its
//! media: audio extensions produce an audio track only, common video containers
//! are assumed to carry both picture and sound, and anything else is treated
//! as silent picture. Media files are never opened.
//!
//! ## Examples
//!
//! ```rust
//! use fcpxml_processor::{generate_motion, parse_fcpxml};
//! use motion_core::{FcpxmlParsingOptions, MotionGenerationOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fcpxml = r#"
//!     <fcpxml version="1.10">
//!       <resources>
//!         <format id="r0" frameDuration="1/30s" width="1280" height="720"/>
//!         <asset id="r1" name="clip" start="0s" duration="10s" format="r0">
//!           <media-rep kind="original-media" src="file:///media/clip.mov"/>
//!         </asset>
//!       </resources>
//!       <library><event><project name="demo">
//!         <sequence format="r0" duration="2s">
//!           <spine>
//!             <asset-clip name="clip" ref="r1" offset="0s" start="0s" duration="2s"/>
//!           </spine>
//!         </sequence>
//!       </project></event></library>
//!     </fcpxml>"#;
//!
//!     let parsed = parse_fcpxml(fcpxml, &FcpxmlParsingOptions::default())?;
//!     assert_eq!(parsed.project.clips.len(), 1);
//!     assert_eq!(parsed.project.width, 1280);
//!
//!     let motion = generate_motion(&parsed.project, &MotionGenerationOptions::default())?;
//!     assert!(motion.contains("<frameRate>30.0</frameRate>"));
//!     assert!(motion.contains("<linkedobjects>"));
//!
//!     Ok(())
//! }
//! ```

pub mod generator;
pub mod parser;

pub use generator::{TIME_SCALE, generate_motion};
pub use parser::{parse_fcpxml, parse_time, try_parse_time};
