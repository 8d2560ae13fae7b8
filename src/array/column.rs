// Copyright 2026 The Riverql Authors.
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

//! A named, typed vector of values sharing one [`DataType`] (C3).

use crate::types::DataType;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
    values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Column {
        Column {
            name: name.into(),
            data_type,
            values: Vec::new(),
        }
    }

    pub fn with_values(name: impl Into<String>, data_type: DataType, values: Vec<Value>) -> Column {
        Column {
            name: name.into(),
            data_type,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, row: usize) -> Option<&Value> {
        self.values.get(row)
    }

    /// An empty column that keeps this column's schema (name + type).
    pub fn empty_like(&self) -> Column {
        Column::new(self.name.clone(), self.data_type)
    }

    pub(crate) fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    pub(crate) fn extend_from(&mut self, other: &Column, rows: &[usize]) {
        for &r in rows {
            self.values.push(other.values[r].clone());
        }
    }

    pub(crate) fn append_all(&mut self, other: &Column) {
        self.values.extend(other.values.iter().cloned());
    }
}
