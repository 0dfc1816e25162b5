/* Copyright 2020 @Yuchen Wong */

use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

pub type Float = f32;

pub type Vector2f = Vector2<Float>;
pub type Vector3f = Vector3<Float>;
pub type Vector4f = Vector4<Float>;
pub type Matrix4f = Matrix4<Float>;

pub const PI: Float = 3.14159265359;
pub const ONE_MINUS_EPSILON: Float = 0.99999994;
