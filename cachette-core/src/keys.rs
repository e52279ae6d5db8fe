/// Conversion from argument values to cache key strings.
///
/// Implementations produce a structural rendering, so distinct values
/// produce distinct keys across the types that matter for memoization: a
/// `String` renders with quotes (`"12"`), an integer without (`12`), a
/// vector keeps its brackets (`[1, 2]`), and a tuple joins its element
/// keys with `|` inside parentheses (`(1|2)`). Two calls with equal
/// arguments therefore share a key, and two calls with different
/// arguments do not.
///
/// The trait is implemented for the primitive numerics, `bool`, `char`,
/// `String`, `str`, references, `Option<T>`, `Vec<T>`, slices, and tuples
/// up to eight elements. Custom argument types implement it by hand,
/// typically through their `Debug` form or a hand-picked stable encoding:
///
/// ```
/// use cachette_core::CacheKey;
///
/// struct Account {
///     region: u8,
///     number: u64,
/// }
///
/// impl CacheKey for Account {
///     fn cache_key(&self) -> String {
///         format!("acct:{}:{}", self.region, self.number)
///     }
/// }
///
/// let account = Account { region: 2, number: 90210 };
/// assert_eq!(account.cache_key(), "acct:2:90210");
/// ```
///
/// # Examples
///
/// ```
/// use cachette_core::CacheKey;
///
/// assert_eq!(42.cache_key(), "42");
/// assert_eq!("42".cache_key(), "\"42\"");
/// assert_eq!((1, "a").cache_key(), "(1|\"a\")");
/// assert_eq!(Some(5).cache_key(), "Some(5)");
/// ```
pub trait CacheKey {
    /// Renders `self` as a cache key string.
    fn cache_key(&self) -> String;
}

// The Debug rendering of these types is already stable and unambiguous:
// strings and chars keep their quotes, numerics and bools print bare.
macro_rules! debug_cache_key {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CacheKey for $ty {
                fn cache_key(&self) -> String {
                    format!("{:?}", self)
                }
            }
        )*
    };
}

debug_cache_key!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char, String,
    str,
);

impl<'a, T: CacheKey + ?Sized> CacheKey for &'a T {
    fn cache_key(&self) -> String {
        (**self).cache_key()
    }
}

impl<T: CacheKey> CacheKey for Option<T> {
    fn cache_key(&self) -> String {
        match self {
            Some(value) => format!("Some({})", value.cache_key()),
            None => "None".to_string(),
        }
    }
}

impl<T: CacheKey> CacheKey for [T] {
    fn cache_key(&self) -> String {
        let parts: Vec<String> = self.iter().map(CacheKey::cache_key).collect();
        format!("[{}]", parts.join(", "))
    }
}

impl<T: CacheKey> CacheKey for Vec<T> {
    fn cache_key(&self) -> String {
        self.as_slice().cache_key()
    }
}

impl CacheKey for () {
    fn cache_key(&self) -> String {
        "()".to_string()
    }
}

// Element keys joined with `|` inside parentheses; the parentheses keep
// nested tuples distinct from flattened ones.
macro_rules! tuple_cache_key {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: CacheKey),+> CacheKey for ($($name,)+) {
            fn cache_key(&self) -> String {
                let parts = [$(self.$idx.cache_key()),+];
                format!("({})", parts.join("|"))
            }
        }
    };
}

tuple_cache_key!(A: 0);
tuple_cache_key!(A: 0, B: 1);
tuple_cache_key!(A: 0, B: 1, C: 2);
tuple_cache_key!(A: 0, B: 1, C: 2, D: 3);
tuple_cache_key!(A: 0, B: 1, C: 2, D: 3, E: 4);
tuple_cache_key!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
tuple_cache_key!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
tuple_cache_key!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);
