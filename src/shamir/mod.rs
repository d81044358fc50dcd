// Copyright 2019 The Grin Developers
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

//! The SLIP-39 share lifecycle: the share data model, the GF(256) Shamir
//! splitter it is built on, and the group/member orchestration that turns
//! a master secret into a set of mnemonics and back.

pub mod scheme;
pub mod share;
pub mod splitter;

pub use self::scheme::GroupShare;
pub use self::share::Share;
pub use self::splitter::Splitter;
