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

use lumen_core::math::{Mat4, Vec3, Vec4};
use lumen_core::renderer::api::{ProgramId, UniformValue};
use lumen_core::renderer::{GraphicsDevice, ShaderError};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

/// A linked vertex + fragment program.
///
/// Writing a uniform the program does not use is not an error: the write is
/// dropped and logged once per name.
pub struct Shader {
    device: Rc<dyn GraphicsDevice>,
    id: ProgramId,
    reported: RefCell<HashSet<String>>,
}

impl Shader {
    /// Compiles and links the two stages.
    pub fn new(
        device: Rc<dyn GraphicsDevice>,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, ShaderError> {
        let id = device.create_program(vertex_source, fragment_source)?;
        log::debug!("Linked shader program {}", id.0);
        Ok(Self {
            device,
            id,
            reported: RefCell::new(HashSet::new()),
        })
    }

    /// Reads both stages from text files, then compiles and links them.
    pub fn from_files(
        device: Rc<dyn GraphicsDevice>,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        let vertex_source = read_source(vertex_path.as_ref())?;
        let fragment_source = read_source(fragment_path.as_ref())?;
        Self::new(device, &vertex_source, &fragment_source)
    }

    /// Makes this program current.
    pub fn bind(&self) {
        self.device.use_program(self.id);
    }

    /// Sets an `int` or `sampler2D` uniform.
    pub fn set_int(&self, name: &str, value: i32) {
        self.set(name, UniformValue::Int(value));
    }

    /// Sets a `bool` uniform.
    pub fn set_bool(&self, name: &str, value: bool) {
        self.set(name, UniformValue::Bool(value));
    }

    /// Sets a `float` uniform.
    pub fn set_float(&self, name: &str, value: f32) {
        self.set(name, UniformValue::Float(value));
    }

    /// Sets a `vec3` uniform.
    pub fn set_vec3(&self, name: &str, value: Vec3) {
        self.set(name, UniformValue::Vec3(value));
    }

    /// Sets a `vec4` uniform.
    pub fn set_vec4(&self, name: &str, value: Vec4) {
        self.set(name, UniformValue::Vec4(value));
    }

    /// Sets a `mat4` uniform.
    pub fn set_mat4(&self, name: &str, value: &Mat4) {
        self.set(name, UniformValue::Mat4(*value));
    }

    /// The driver handle.
    pub fn id(&self) -> ProgramId {
        self.id
    }

    fn set(&self, name: &str, value: UniformValue) {
        if !self.device.set_uniform(self.id, name, value)
            && self.reported.borrow_mut().insert(name.to_owned())
        {
            log::warn!(
                "Shader {}: uniform '{}' is not active, writes are ignored",
                self.id.0,
                name
            );
        }
    }
}

fn read_source(path: &Path) -> Result<String, ShaderError> {
    std::fs::read_to_string(path).map_err(|err| ShaderError::LoadError {
        path: path.display().to_string(),
        source_error: err.to_string(),
    })
}

impl fmt::Debug for Shader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shader").field("id", &self.id).finish()
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        self.device.destroy_program(self.id);
    }
}
