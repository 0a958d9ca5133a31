use num::traits::{Num, NumAssignOps, NumCast, real::Real};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A 3D vector generic over any numeric type.
///
/// This struct represents a 3D point or vector in space and provides common
/// mathematical operations such as addition, normalization, projection removal,
/// and angle calculations.
///
/// # Type Parameters
/// * `T` - The functionality for the vector depends on traits implemented by `T`.
#[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq, Clone, Copy)]
pub struct Vec3D<T> {
    /// The x-component of the vector.
    x: T,
    /// The y-component of the vector.
    y: T,
    /// The z-component of the vector.
    z: T,
}

impl<T: Copy> Vec3D<T> {
    /// Creates a new vector with the given x, y and z components.
    ///
    /// # Arguments
    /// * `x` - The x-component of the vector.
    /// * `y` - The y-component of the vector.
    /// * `z` - The z-component of the vector.
    ///
    /// # Returns
    /// A new `Vec3D` object.
    pub const fn new(x: T, y: T, z: T) -> Self { Self { x, y, z } }

    /// Returns the x-component of the vector.
    pub const fn x(&self) -> T { self.x }

    /// Returns the y-component of the vector.
    pub const fn y(&self) -> T { self.y }

    /// Returns the z-component of the vector.
    pub const fn z(&self) -> T { self.z }

    /// Replaces the y-component, keeping x and z.
    pub fn with_y(&self, y: T) -> Self { Self::new(self.x, y, self.z) }
}

impl<T: Num + NumCast + Copy> Vec3D<T> {
    /// Computes the dot product of the current vector with another vector.
    ///
    /// # Arguments
    /// * `other` - Another `Vec3D` vector to compute the dot product with.
    ///
    /// # Returns
    /// A scalar value of type `T` that represents the dot product of the two vectors.
    pub fn dot(self, other: Vec3D<T>) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Creates a zero vector (x = 0, y = 0, z = 0).
    ///
    /// # Returns
    /// A zero-initialized `Vec3D` with member type `T`.
    pub fn zero() -> Self { Self::new(T::zero(), T::zero(), T::zero()) }

    pub fn cast<D: NumCast>(self) -> Vec3D<D> {
        Vec3D {
            x: D::from(self.x).unwrap(),
            y: D::from(self.y).unwrap(),
            z: D::from(self.z).unwrap(),
        }
    }
}

impl<T> Vec3D<T>
where
    T: Real + NumCast + NumAssignOps,
{
    /// Computes the magnitude (absolute value) of the vector.
    ///
    /// # Returns
    /// The magnitude of the vector as a scalar of type `T`.
    pub fn abs(&self) -> T { (self.x.powi(2) + self.y.powi(2) + self.z.powi(2)).sqrt() }

    /// Normalizes the vector to have a magnitude of 1.
    /// If the magnitude is zero, the original vector is returned unmodified.
    ///
    /// # Returns
    /// A normalized vector.
    pub fn normalize(self) -> Self {
        let magnitude = self.abs();
        if magnitude.is_zero() {
            self
        } else {
            Self::new(self.x / magnitude, self.y / magnitude, self.z / magnitude)
        }
    }

    /// Removes the component of the vector that is parallel to `normal`,
    /// leaving only the part orthogonal to it.
    /// If `normal` has zero magnitude, the original vector is returned unmodified.
    ///
    /// # Arguments
    /// * `normal` - The direction to exclude from the vector.
    ///
    /// # Returns
    /// The projection of the vector onto the plane orthogonal to `normal`.
    pub fn exclude(self, normal: Self) -> Self {
        let n_sq = normal.dot(normal);
        if n_sq.is_zero() {
            self
        } else {
            self - normal * (self.dot(normal) / n_sq)
        }
    }

    /// Computes the unsigned angle between the current vector and another vector.
    ///
    /// # Arguments
    /// * `other` - The vector to measure the angle against.
    ///
    /// # Returns
    /// The angle in degrees within `[0, 180]`. Returns zero if either vector
    /// has zero magnitude.
    pub fn angle_deg(&self, other: &Self) -> T {
        let denom = self.abs() * other.abs();
        if denom.is_zero() {
            return T::zero();
        }
        let cos = (self.dot(*other) / denom).min(T::one()).max(-T::one());
        cos.acos().to_degrees()
    }
}

impl<T, TAdd> Add<Vec3D<TAdd>> for Vec3D<T>
where
    T: Num + NumCast,
    TAdd: Num + NumCast,
{
    type Output = Vec3D<T>;

    /// Implements the `+` operator for two `Vec3D` objects.
    fn add(self, rhs: Vec3D<TAdd>) -> Self::Output {
        Self::Output {
            x: self.x + T::from(rhs.x).unwrap(),
            y: self.y + T::from(rhs.y).unwrap(),
            z: self.z + T::from(rhs.z).unwrap(),
        }
    }
}

impl<T, TSub> Sub<Vec3D<TSub>> for Vec3D<T>
where
    T: Num + NumCast,
    TSub: Num + NumCast,
{
    type Output = Vec3D<T>;

    /// Implements the `-` operator for two `Vec3D` objects.
    fn sub(self, rhs: Vec3D<TSub>) -> Self::Output {
        Self::Output {
            x: self.x - T::from(rhs.x).unwrap(),
            y: self.y - T::from(rhs.y).unwrap(),
            z: self.z - T::from(rhs.z).unwrap(),
        }
    }
}

impl<T, TMul> Mul<TMul> for Vec3D<T>
where
    T: Num + NumCast,
    TMul: Num + NumCast + Copy,
{
    type Output = Vec3D<T>;

    /// Implements the `*` operator for a `Vec3D` and a scalar.
    fn mul(self, rhs: TMul) -> Self::Output {
        Self::Output {
            x: self.x * T::from(rhs).unwrap(),
            y: self.y * T::from(rhs).unwrap(),
            z: self.z * T::from(rhs).unwrap(),
        }
    }
}

impl<T, TDiv> Div<TDiv> for Vec3D<T>
where
    T: Num + NumCast,
    TDiv: Num + NumCast + Copy,
{
    type Output = Vec3D<T>;

    /// Implements the `/` operator for a `Vec3D` and a scalar.
    fn div(self, rhs: TDiv) -> Self::Output {
        Self::Output {
            x: self.x / T::from(rhs).unwrap(),
            y: self.y / T::from(rhs).unwrap(),
            z: self.z / T::from(rhs).unwrap(),
        }
    }
}

impl<T: Neg<Output = T>> Neg for Vec3D<T> {
    type Output = Vec3D<T>;

    /// Implements the unary `-` operator, flipping every component.
    fn neg(self) -> Self::Output {
        Self::Output {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl<T: Num + NumCast> From<(T, T, T)> for Vec3D<T> {
    /// Creates a `Vec3D` from a tuple of (x, y, z) values.
    fn from(tuple: (T, T, T)) -> Self {
        Vec3D {
            x: tuple.0,
            y: tuple.1,
            z: tuple.2,
        }
    }
}
