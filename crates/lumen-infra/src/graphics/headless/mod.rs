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

//! A device without a GPU.
//!
//! [`HeadlessDevice`] hands out ids, keeps the content of every live object
//! and models the driver's binding points, so the pipeline can run in tests
//! and command-line tools. Every call is also recorded as a [`DeviceCommand`].

mod command;
mod device;

pub use self::command::{DeviceCommand, DrawCall};
pub use self::device::{HeadlessDevice, TextureInfo, DEFAULT_TEXTURE_UNITS};
