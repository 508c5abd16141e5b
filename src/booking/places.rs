//! Static place → facility-id lookup table
//!
//! The portal identifies each bookable room by an opaque 32-hex-char facility
//! id (`FId`). The display names and ids below are portal constants; the
//! Chinese room descriptions are part of the exact display name the server
//! expects and must not be altered.

/// All bookable rooms: `(display name, facility id)`
pub const PLACES: &[(&str, &str)] = &[
    ("MPC319 管弦乐学部", "0bf599e78f3a46dda05e65cd8fd4f61a"),
    ("MPC320 管弦乐学部", "117da0ca23dd4ff4860dff461e9d6ff4"),
    ("MPC321 室内乐琴房（GP）", "76e34000bc5348598a705ae483005308"),
    ("MPC322 室内乐琴房（UP）", "f02f83d544f4490f8237c869eee87913"),
    ("MPC323 管弦乐学部琴房", "a73c09fc1dd74ee7a495edae53b7c2f0"),
    ("MPC324 管弦乐学部琴房", "62508f2d7a91455fad00839609b1c63b"),
    ("MPC325 管弦乐学部琴房（UP）", "28209733f1be415383f16a253737f2db"),
    ("MPC326 管弦乐学部琴房（UP）", "af3b514fb3f5490ead315a4152df6abd"),
    ("MPC327 管弦乐学部琴房（UP）", "34d88aa5f4fd476ab013dcc561ee1063"),
    ("MPC328 管弦乐学部琴房（UP）", "1ab85f1a6dc44474ae8bad97a55097e9"),
    ("MPC329 管弦乐学部琴房（UP）", "d828d19e79604c3cb02040576bd23104"),
    ("MPC334 室内乐琴房（GP）", "dc4f0f555ac34e5e8c659b71887e9743"),
    ("MPC335 管弦乐学部琴房", "2a695052a7ce4d11aa0e23b96194ec32"),
    ("MPC336 管弦乐学部琴房", "032bba7d83ff4a20a4ab74f9343f3b82"),
    ("MPC337 管弦乐学部琴房", "7c410dcf1a1747d2b3e35d1e16b9894e"),
    ("MPC401 管弦乐学部琴房", "b67000e23c27464386ee417d3851aa00"),
    ("MPC402 管弦乐学部琴房", "f69d6cf620d149e2bc1800a2c61d1843"),
    ("MPC403 管弦乐学部琴房", "e5cd05208c7343148050fbc54c9df753"),
    ("MPC404 管弦乐学部琴房", "07b0c915577049e786ce4608b419a56f"),
    ("MPC405 管弦乐学部琴房", "ce111f3b2d5e481abd10ed03d15dc282"),
    ("MPC406 管弦乐学部琴房（UP）", "eec8bb6419c04d3581264b1497f70248"),
    ("MPC407 管弦乐学部琴房", "2f446f29b3cf456aac29d260b883380d"),
    ("MPC408 管弦乐学部琴房（UP）", "9aac575aab0b4c76a7b5e009d745eadd"),
    ("MPC409 管弦乐学部琴房（UP）", "8d84d1b18a6141cdbf2513b4bdfe68ba"),
    ("MPC410 管弦乐学部琴房", "5da100f8db6f449c97ba445c0bfe8eb6"),
    ("MPC411 管弦乐学部琴房", "fda92551c763443abc5e0c189295512c"),
    ("MPC412 室内乐琴房（GP）", "1c89c2dacef342e7be2b37c98c275236"),
    ("MPC413 室内乐琴房（UP）", "da7a15b42471405bb0af3bfa5e7f7238"),
    ("MPC414 管弦乐学部琴房", "c3327b0749e545d7b64516a682e18189"),
    ("MPC415 管弦乐学部琴房（UP）", "6d782a5fe1054a32bb6ae4b135648593"),
    ("MPC416 管弦乐学部琴房", "68e84f84eee1461a8e9dfe9ed5b4c5b1"),
    ("MPC417 管弦乐学部琴房（UP）", "a2cf5f7eea204adabb1b644f99e1d9bc"),
    ("MPC418 管弦乐学部琴房（GP）", "55590a8d83f84744bb11634fc2d7738e"),
    ("MPC419 管弦乐学部琴房（GP）", "b2892c0e12f94b4ca36a3618bd33628c"),
    ("MPC420 管弦乐学部琴房（GP）", "0cbb5a428d484333b52f904e534444af"),
    ("MPC421 管弦乐学部琴房", "d15552be0d9849eb8549d1a63b2e862e"),
    ("MPC422 管弦乐学部琴房（GP）", "bb9b779bf79c416c905149dd21e47bc4"),
    ("MPC423 管弦乐学部琴房", "b36918432d2246859761f7e0c0eb147b"),
    ("MPC424 管弦乐学部琴房（GP）", "0041a2034f7348e7a2a5cd279c5d5d93"),
    ("MPC425 室内乐琴房（GP）", "487eade0fb874e6e8962cc8f75b3f7bb"),
    ("MPC426 管弦乐学部琴房", "b7a5fcb27c054d55a712f2993cd04d07"),
    ("MPC427 管弦乐学部琴房", "6ba6de4ea11246d185485b52637d362b"),
    ("MPC428 管弦乐学部琴房", "56bfa46d5390495e826f017da64edc6c"),
    ("MPC429 管弦乐学部琴房", "de003fd87e844066b952800365abac8d"),
    ("MPC430 管弦乐学部琴房", "4b7c0c08d5ee45a09ba94dba907159cd"),
    ("MPC518 室内乐琴房（Double GP）", "9fa74f29bc8b494dacbecffa1a39ba0f"),
    ("MPC519 室内乐琴房（Double GP）", "eabe116377d5454981ae80af5dd13616"),
    ("MPC524室内乐琴房（Double GP）", "91bbe4ac68d04025bef15eb76abe5a3d"),
];

/// Resolve a display name to its facility id, `None` for unknown places
pub fn facility_id(place: &str) -> Option<&'static str> {
    PLACES
        .iter()
        .find(|(name, _)| *name == place)
        .map(|(_, fid)| *fid)
}

/// Iterator over all known place display names
pub fn place_names() -> impl Iterator<Item = &'static str> {
    PLACES.iter().map(|(name, _)| *name)
}
