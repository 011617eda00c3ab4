//! Element and isotope mass data.

use std::collections::HashMap;

/// Rest mass of the electron in unified atomic mass units.
pub const ELECTRON_MASS: f64 = 0.000_548_579_909_46;

/// One stable isotope of an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Isotope {
    /// Nucleon count, e.g. 13 for carbon-13.
    pub mass_number: u16,
    /// Exact mass in u.
    pub mass: f64,
    /// Natural abundance fraction.
    pub abundance: f64,
}

/// A chemical element with its natural isotope distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    /// Element symbol, e.g. `"Na"`.
    pub symbol: &'static str,
    /// Standard atomic weight.
    pub average_mass: f64,
    /// Stable isotopes.
    pub isotopes: &'static [Isotope],
}

impl Element {
    /// Mass of the most abundant isotope.
    pub fn monoisotopic_mass(&self) -> f64 {
        self.isotopes
            .iter()
            .max_by(|a, b| a.abundance.total_cmp(&b.abundance))
            .map(|iso| iso.mass)
            .unwrap_or(self.average_mass)
    }

    /// Looks up an isotope by mass number.
    pub fn isotope(&self, mass_number: u16) -> Option<&Isotope> {
        self.isotopes.iter().find(|iso| iso.mass_number == mass_number)
    }
}

const fn iso(mass_number: u16, mass: f64, abundance: f64) -> Isotope {
    Isotope {
        mass_number,
        mass,
        abundance,
    }
}

const fn el(symbol: &'static str, average_mass: f64, isotopes: &'static [Isotope]) -> Element {
    Element {
        symbol,
        average_mass,
        isotopes,
    }
}

static ELEMENTS: &[Element] = &[
    el("H", 1.007_94, &[iso(1, 1.007_825_032_07, 0.999_885), iso(2, 2.014_101_777_8, 0.000_115)]),
    el("Li", 6.941, &[iso(6, 6.015_122_795, 0.0759), iso(7, 7.016_004_55, 0.9241)]),
    el("B", 10.811, &[iso(10, 10.012_937, 0.199), iso(11, 11.009_305_4, 0.801)]),
    el("C", 12.010_7, &[iso(12, 12.0, 0.9893), iso(13, 13.003_354_837_8, 0.0107)]),
    el("N", 14.006_7, &[iso(14, 14.003_074_004_8, 0.996_36), iso(15, 15.000_108_898_2, 0.003_64)]),
    el(
        "O",
        15.999_4,
        &[
            iso(16, 15.994_914_619_56, 0.997_57),
            iso(17, 16.999_131_70, 0.000_38),
            iso(18, 17.999_161_0, 0.002_05),
        ],
    ),
    el("F", 18.998_403_2, &[iso(19, 18.998_403_22, 1.0)]),
    el("Na", 22.989_769_28, &[iso(23, 22.989_769_280_9, 1.0)]),
    el(
        "Mg",
        24.305_0,
        &[
            iso(24, 23.985_041_700, 0.7899),
            iso(25, 24.985_836_92, 0.1000),
            iso(26, 25.982_592_929, 0.1101),
        ],
    ),
    el("Al", 26.981_538_6, &[iso(27, 26.981_538_63, 1.0)]),
    el(
        "Si",
        28.085_5,
        &[
            iso(28, 27.976_926_532_5, 0.922_23),
            iso(29, 28.976_494_700, 0.046_85),
            iso(30, 29.973_770_17, 0.030_92),
        ],
    ),
    el("P", 30.973_762, &[iso(31, 30.973_761_63, 1.0)]),
    el(
        "S",
        32.065,
        &[
            iso(32, 31.972_071_00, 0.9499),
            iso(33, 32.971_458_76, 0.0075),
            iso(34, 33.967_866_90, 0.0425),
            iso(36, 35.967_080_76, 0.0001),
        ],
    ),
    el("Cl", 35.453, &[iso(35, 34.968_852_68, 0.7576), iso(37, 36.965_902_59, 0.2424)]),
    el(
        "K",
        39.098_3,
        &[
            iso(39, 38.963_706_68, 0.932_581),
            iso(40, 39.963_998_48, 0.000_117),
            iso(41, 40.961_825_76, 0.067_302),
        ],
    ),
    el(
        "Ca",
        40.078,
        &[
            iso(40, 39.962_590_98, 0.969_41),
            iso(42, 41.958_618_01, 0.006_47),
            iso(43, 42.958_766_6, 0.001_35),
            iso(44, 43.955_481_8, 0.020_86),
            iso(46, 45.953_692_6, 0.000_04),
            iso(48, 47.952_534, 0.001_87),
        ],
    ),
    el("Mn", 54.938_045, &[iso(55, 54.938_045_1, 1.0)]),
    el(
        "Fe",
        55.845,
        &[
            iso(54, 53.939_610_5, 0.058_45),
            iso(56, 55.934_937_5, 0.917_54),
            iso(57, 56.935_394_0, 0.021_19),
            iso(58, 57.933_275_6, 0.002_82),
        ],
    ),
    el("Co", 58.933_195, &[iso(59, 58.933_195_0, 1.0)]),
    el(
        "Ni",
        58.693_4,
        &[
            iso(58, 57.935_342_9, 0.680_769),
            iso(60, 59.930_786_4, 0.262_231),
            iso(61, 60.931_056_0, 0.011_399),
            iso(62, 61.928_345_1, 0.036_345),
            iso(64, 63.927_966_0, 0.009_256),
        ],
    ),
    el("Cu", 63.546, &[iso(63, 62.929_597_5, 0.6915), iso(65, 64.927_789_5, 0.3085)]),
    el(
        "Zn",
        65.38,
        &[
            iso(64, 63.929_142_2, 0.482_68),
            iso(66, 65.926_033_4, 0.279_75),
            iso(67, 66.927_127_3, 0.041_02),
            iso(68, 67.924_844_2, 0.190_24),
            iso(70, 69.925_319_3, 0.006_31),
        ],
    ),
    el("As", 74.921_60, &[iso(75, 74.921_596_5, 1.0)]),
    el(
        "Se",
        78.96,
        &[
            iso(74, 73.922_476_4, 0.0089),
            iso(76, 75.919_213_6, 0.0937),
            iso(77, 76.919_914_0, 0.0763),
            iso(78, 77.917_309_1, 0.2377),
            iso(80, 79.916_521_3, 0.4961),
            iso(82, 81.916_699_4, 0.0873),
        ],
    ),
    el("Br", 79.904, &[iso(79, 78.918_337_1, 0.5069), iso(81, 80.916_290_6, 0.4931)]),
    el("I", 126.904_47, &[iso(127, 126.904_473, 1.0)]),
];

/// Symbol-indexed element lookup owned by an engine instance.
#[derive(Debug, Clone)]
pub struct ElementTable {
    by_symbol: HashMap<&'static str, &'static Element>,
}

impl ElementTable {
    /// Builds the table of elements needed for small-molecule formulas.
    pub fn standard() -> Self {
        let by_symbol = ELEMENTS.iter().map(|e| (e.symbol, e)).collect();
        Self { by_symbol }
    }

    /// Looks up an element by symbol.
    pub fn get(&self, symbol: &str) -> Option<&'static Element> {
        self.by_symbol.get(symbol).copied()
    }

    /// Number of known elements.
    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    /// Returns `true` if the table holds no elements.
    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }
}

impl Default for ElementTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_symbols() {
        let table = ElementTable::standard();
        assert_eq!(table.get("Na").unwrap().symbol, "Na");
        assert!(table.get("Xx").is_none());
        assert!(!table.is_empty());
    }

    #[test]
    fn monoisotopic_is_most_abundant() {
        let table = ElementTable::standard();
        assert_eq!(table.get("C").unwrap().monoisotopic_mass(), 12.0);
        let se = table.get("Se").unwrap().monoisotopic_mass();
        assert!((se - 79.916_521_3).abs() < 1e-9);
    }

    #[test]
    fn isotope_lookup() {
        let table = ElementTable::standard();
        let c = table.get("C").unwrap();
        assert!(c.isotope(13).is_some());
        assert!(c.isotope(14).is_none());
    }

    #[test]
    fn abundances_sum_to_one() {
        for element in ELEMENTS {
            let total: f64 = element.isotopes.iter().map(|i| i.abundance).sum();
            assert!((total - 1.0).abs() < 1e-3, "{}: {total}", element.symbol);
        }
    }
}
