// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod crawlera_test;
pub mod helpers;
pub mod splash_middleware_test;
