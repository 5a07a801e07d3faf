use core::{
    fmt::Debug,
    ops::{Add, Mul, Neg},
};

use crypto_bigint::subtle::{Choice, ConditionallySelectable};
use secrecy::{ExposeSecret, SecretBox};
use zeroize::Zeroize;

use crate::{
    arithmetic::{mul_secret, ProjectivePoint, Scalar},
    context::Context,
};

/// A helper wrapper for managing secret values.
///
/// On top of `secrecy::SecretBox` functionality, it provides:
/// - Safe `Clone` implementation (without needing to impl `CloneableSecret`)
/// - Safe `Debug` implementation
/// - Arithmetic that keeps intermediate results boxed and zeroized on drop
pub(crate) struct Secret<T: Zeroize>(SecretBox<T>);

impl<T> Secret<T>
where
    T: Zeroize,
{
    pub fn expose_secret(&self) -> &T {
        self.0.expose_secret()
    }
}

impl<T> Secret<T>
where
    T: Zeroize + Clone,
{
    pub fn init_with(ctr: impl FnOnce() -> T) -> Self {
        Self(SecretBox::init_with(ctr))
    }

    pub fn try_init_with<E>(ctr: impl FnOnce() -> Result<T, E>) -> Result<Self, E> {
        Ok(Self(SecretBox::try_init_with(ctr)?))
    }
}

impl<T> Clone for Secret<T>
where
    T: Zeroize + Clone,
{
    fn clone(&self) -> Self {
        Self::init_with(|| self.0.expose_secret().clone())
    }
}

impl<T> Debug for Secret<T>
where
    T: Zeroize,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Secret<{}>(...)", core::any::type_name::<T>())
    }
}

impl<T> Secret<T>
where
    T: Zeroize + Clone + ConditionallySelectable,
{
    pub fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Secret::init_with(|| T::conditional_select(a.expose_secret(), b.expose_secret(), choice))
    }
}

impl<T> Neg for &Secret<T>
where
    T: Zeroize + Clone + Neg<Output = T>,
{
    type Output = Secret<T>;
    fn neg(self) -> Self::Output {
        Secret::init_with(|| self.expose_secret().clone().neg())
    }
}

impl<'a, T> Add<&'a T> for &Secret<T>
where
    T: Zeroize + Clone + Add<Output = T>,
{
    type Output = Secret<T>;
    fn add(self, rhs: &'a T) -> Self::Output {
        Secret::init_with(|| self.expose_secret().clone() + rhs.clone())
    }
}

impl<'a, T> Add<&'a Secret<T>> for &Secret<T>
where
    T: Zeroize + Clone + Add<Output = T>,
{
    type Output = Secret<T>;
    fn add(self, rhs: &'a Secret<T>) -> Self::Output {
        self + rhs.expose_secret()
    }
}

impl<'a, T> Mul<&'a T> for &Secret<T>
where
    T: Zeroize + Clone + Mul<Output = T>,
{
    type Output = Secret<T>;
    fn mul(self, rhs: &'a T) -> Self::Output {
        Secret::init_with(|| self.expose_secret().clone() * rhs.clone())
    }
}

impl<'a, T> Mul<&'a Secret<T>> for &Secret<T>
where
    T: Zeroize + Clone + Mul<Output = T>,
{
    type Output = Secret<T>;
    fn mul(self, rhs: &'a Secret<T>) -> Self::Output {
        self * rhs.expose_secret()
    }
}

// Scalar-specific impls

impl Secret<Scalar> {
    /// `self * G` in constant time.
    pub fn mul_by_generator(&self, ctx: &Context) -> ProjectivePoint {
        ctx.mul_generator(self.expose_secret())
    }

    /// The inverse of a scalar known to be non-zero.
    pub fn invert(&self) -> Secret<Scalar> {
        Secret::init_with(|| {
            Option::<Scalar>::from(self.expose_secret().invert()).expect("the scalar is checked to be non-zero")
        })
    }
}

impl Mul<&Secret<Scalar>> for &ProjectivePoint {
    type Output = ProjectivePoint;
    fn mul(self, scalar: &Secret<Scalar>) -> Self::Output {
        mul_secret(self, scalar.expose_secret())
    }
}
