//! Generates the keyframe-selection part of the morph vertex shader.
//!
//! The emitted WGSL defines `MORPH_KEYFRAMES` and
//! `fn morph_segment(progress: f32) -> vec2<f32>`, returning the lower
//! keyframe index (as float) and the mix factor. The static body in
//! `shaders/morph.wgsl` does the lookups and holds the entry points.

use crate::constants::MORPH_BRANCH_CHAIN_MAX;
use crate::error::{CoreError, Result};
use crate::morph::{scaled_progress, Segment};
use std::fmt::Write;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MorphShaderStyle {
    /// `if / else if` per segment, lowest index first. The final `else`
    /// takes the last segment, which is where `progress == 1` lands.
    BranchChain,
    /// `floor(scaled)` clamped to `K − 2`.
    IndexedArray,
}

impl MorphShaderStyle {
    pub fn for_keyframes(keyframes: usize) -> Self {
        if keyframes <= MORPH_BRANCH_CHAIN_MAX {
            MorphShaderStyle::BranchChain
        } else {
            MorphShaderStyle::IndexedArray
        }
    }
}

/// Only the selection prelude for `keyframes` shapes.
pub fn morph_select_source(keyframes: usize, style: MorphShaderStyle) -> Result<String> {
    if keyframes < 2 {
        return Err(CoreError::TooFewKeyframes(keyframes));
    }
    let last = keyframes - 2;
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "const MORPH_KEYFRAMES: u32 = {keyframes}u;");
    let _ = writeln!(out);
    let _ = writeln!(out, "fn morph_segment(progress: f32) -> vec2<f32> {{");
    let _ = writeln!(
        out,
        "    let scaled = clamp(progress, 0.0, 1.0) * f32(MORPH_KEYFRAMES - 1u);"
    );
    let _ = writeln!(out, "    var from_k: u32;");
    let _ = writeln!(out, "    var t: f32;");
    match style {
        MorphShaderStyle::BranchChain if last == 0 => {
            let _ = writeln!(out, "    from_k = 0u;");
            let _ = writeln!(out, "    t = scaled;");
        }
        MorphShaderStyle::BranchChain => {
            for i in 0..last {
                let kw = if i == 0 { "if" } else { "} else if" };
                let _ = writeln!(out, "    {kw} (scaled < {}.0) {{", i + 1);
                let _ = writeln!(out, "        from_k = {i}u;");
                let _ = writeln!(out, "        t = scaled - {i}.0;");
            }
            let _ = writeln!(out, "    }} else {{");
            let _ = writeln!(out, "        from_k = {last}u;");
            let _ = writeln!(out, "        t = clamp(scaled - {last}.0, 0.0, 1.0);");
            let _ = writeln!(out, "    }}");
        }
        MorphShaderStyle::IndexedArray => {
            let _ = writeln!(
                out,
                "    from_k = min(u32(floor(scaled)), MORPH_KEYFRAMES - 2u);"
            );
            let _ = writeln!(out, "    t = clamp(scaled - f32(from_k), 0.0, 1.0);");
        }
    }
    let _ = writeln!(out, "    return vec2<f32>(f32(from_k), t);");
    let _ = writeln!(out, "}}");
    Ok(out)
}

/// Complete morph shader module: generated prelude followed by `body`.
pub fn morph_shader_source(keyframes: usize, style: MorphShaderStyle, body: &str) -> Result<String> {
    let mut src = morph_select_source(keyframes, style)?;
    src.push('\n');
    src.push_str(body);
    Ok(src)
}

/// Host-side replay of the branch chain the generator emits, used to check
/// it against the reference segment selection.
pub fn branch_chain_segment(progress: f32, keyframes: usize) -> Segment {
    let k = keyframes.max(2);
    let scaled = scaled_progress(progress, k);
    let last = k - 2;
    for i in 0..last {
        if scaled < (i + 1) as f32 {
            return Segment {
                from: i,
                to: i + 1,
                t: scaled - i as f32,
            };
        }
    }
    Segment {
        from: last,
        to: last + 1,
        t: (scaled - last as f32).clamp(0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_switches_above_threshold() {
        assert_eq!(
            MorphShaderStyle::for_keyframes(MORPH_BRANCH_CHAIN_MAX),
            MorphShaderStyle::BranchChain
        );
        assert_eq!(
            MorphShaderStyle::for_keyframes(MORPH_BRANCH_CHAIN_MAX + 1),
            MorphShaderStyle::IndexedArray
        );
    }

    #[test]
    fn two_keyframes_need_no_branches() {
        let src = morph_select_source(2, MorphShaderStyle::BranchChain).unwrap();
        assert!(src.contains("const MORPH_KEYFRAMES: u32 = 2u;"));
        assert!(!src.contains("if ("));
    }

    #[test]
    fn rejects_single_keyframe() {
        assert_eq!(
            morph_select_source(1, MorphShaderStyle::IndexedArray),
            Err(CoreError::TooFewKeyframes(1))
        );
    }
}
