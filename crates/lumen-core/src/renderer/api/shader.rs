// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Shader program handles and uniform values.

use crate::math::{Mat4, Vec3, Vec4};

/// An opaque handle to a linked shader program. `0` means "no program".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ProgramId(pub u32);

impl ProgramId {
    /// The sentinel id that refers to no program.
    pub const NONE: Self = Self(0);

    /// Returns `true` if this is the sentinel id.
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

/// A programmable stage of the graphics pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// The vertex shader stage.
    Vertex,
    /// The fragment (pixel) shader stage.
    Fragment,
}

/// A value written to a named uniform of a program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// `int` or `sampler2D` uniforms.
    Int(i32),
    /// `bool` uniforms, uploaded as an int.
    Bool(bool),
    /// `float` uniforms.
    Float(f32),
    /// `vec3` uniforms.
    Vec3(Vec3),
    /// `vec4` uniforms.
    Vec4(Vec4),
    /// `mat4` uniforms, column-major.
    Mat4(Mat4),
}
