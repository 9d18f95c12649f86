//! Static rename/recode tables for the vendor CSV schemas.
//!
//! The PPMI study files carry one column per questionnaire item; composite
//! scores are assembled here from fixed item lists. Column names are the
//! vendor's, verbatim — including the misspelled `PN3RIGRL` in the UPDRS III
//! file.

pub(crate) const PATNO: &str = "PATNO";
pub(crate) const EVENT_ID: &str = "EVENT_ID";
pub(crate) const INFODT: &str = "INFODT";
pub(crate) const PAG_NAME: &str = "PAG_NAME";

/// Per-item recode applied before a group collapses to one score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ItemRecode {
    Identity,
    Negate,
    /// 1 when the answer is 0, otherwise 0 (reverse-keyed yes/no items).
    OneIfZero,
    /// 1 for twelve or fewer years of education, otherwise 0.
    OneIfAtMost12,
    /// 5 minus the answer (reverse-keyed 1-4 Likert items).
    ReverseLikert5,
    /// The missing-data code 9 counts as the maximum burden of 3.
    NineToThree,
    /// The missing-data code 9 counts as 0.
    NineToZero,
    /// 1/x, with x == 0 mapping to +inf.
    Reciprocal,
}

/// How the items of one group collapse into a single score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GroupOp {
    Sum,
    Min,
    Any,
}

/// How per-group scores combine into the measure score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CombineOp {
    Sum,
    Mean { ignore_nulls: bool },
    Product,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ItemGroup {
    pub items: &'static [&'static str],
    pub recode: ItemRecode,
    pub op: GroupOp,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct SourceFile {
    pub file: &'static str,
    pub groups: &'static [ItemGroup],
}

/// Which columns identify a row while a measure is being assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyColumns {
    /// `PATNO`, `EVENT_ID`, `INFODT`, `PAG_NAME`.
    WithPage,
    /// `PATNO`, `EVENT_ID`, `INFODT` — used when a measure spans files whose
    /// page names differ and the page would break the join.
    NoPage,
}

impl KeyColumns {
    pub(crate) fn names(self) -> &'static [&'static str] {
        match self {
            KeyColumns::WithPage => &[PATNO, EVENT_ID, INFODT, PAG_NAME],
            KeyColumns::NoPage => &[PATNO, EVENT_ID, INFODT],
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct BehaviorMeasure {
    pub name: &'static str,
    pub files: &'static [SourceFile],
    pub keys: KeyColumns,
    pub combine: CombineOp,
}

const fn group(items: &'static [&'static str]) -> ItemGroup {
    ItemGroup {
        items,
        recode: ItemRecode::Identity,
        op: GroupOp::Sum,
    }
}

const fn recoded(items: &'static [&'static str], recode: ItemRecode) -> ItemGroup {
    ItemGroup {
        items,
        recode,
        op: GroupOp::Sum,
    }
}

pub(crate) const BEHAVIOR_MEASURES: &[BehaviorMeasure] = &[
    BehaviorMeasure {
        name: "benton",
        files: &[SourceFile {
            file: "Benton_Judgment_of_Line_Orientation.csv",
            groups: &[group(&[
                "BJLOT1", "BJLOT2", "BJLOT3", "BJLOT4", "BJLOT5", "BJLOT6", "BJLOT7", "BJLOT8",
                "BJLOT9", "BJLOT10", "BJLOT11", "BJLOT12", "BJLOT13", "BJLOT14", "BJLOT15",
                "BJLOT16", "BJLOT17", "BJLOT18", "BJLOT19", "BJLOT20", "BJLOT21", "BJLOT22",
                "BJLOT23", "BJLOT24", "BJLOT25", "BJLOT26", "BJLOT27", "BJLOT28", "BJLOT29",
                "BJLOT30",
            ])],
        }],
        keys: KeyColumns::WithPage,
        combine: CombineOp::Sum,
    },
    BehaviorMeasure {
        name: "education",
        files: &[SourceFile {
            file: "Socio-Economics.csv",
            groups: &[recoded(&["EDUCYRS"], ItemRecode::OneIfAtMost12)],
        }],
        keys: KeyColumns::WithPage,
        combine: CombineOp::Sum,
    },
    BehaviorMeasure {
        name: "epworth",
        files: &[SourceFile {
            file: "Epworth_Sleepiness_Scale.csv",
            groups: &[group(&[
                "ESS1", "ESS2", "ESS3", "ESS4", "ESS5", "ESS6", "ESS7", "ESS8",
            ])],
        }],
        keys: KeyColumns::WithPage,
        combine: CombineOp::Sum,
    },
    BehaviorMeasure {
        name: "gds",
        files: &[SourceFile {
            file: "Geriatric_Depression_Scale__Short_.csv",
            groups: &[
                recoded(
                    &["GDSSATIS", "GDSGSPIR", "GDSHAPPY", "GDSALIVE", "GDSENRGY"],
                    ItemRecode::OneIfZero,
                ),
                group(&[
                    "GDSDROPD", "GDSEMPTY", "GDSBORED", "GDSAFRAD", "GDSHLPLS", "GDSHOME",
                    "GDSMEMRY", "GDSWRTLS", "GDSHOPLS", "GDSBETER",
                ]),
            ],
        }],
        keys: KeyColumns::WithPage,
        combine: CombineOp::Sum,
    },
    BehaviorMeasure {
        name: "hvlt_recall",
        files: &[SourceFile {
            file: "Hopkins_Verbal_Learning_Test.csv",
            groups: &[group(&["HVLTRT1", "HVLTRT2", "HVLTRT3"])],
        }],
        keys: KeyColumns::WithPage,
        combine: CombineOp::Sum,
    },
    BehaviorMeasure {
        name: "hvlt_recognition",
        files: &[SourceFile {
            file: "Hopkins_Verbal_Learning_Test.csv",
            groups: &[
                group(&["HVLTREC"]),
                recoded(&["HVLTFPRL"], ItemRecode::Negate),
                recoded(&["HVLTFPUN"], ItemRecode::Negate),
            ],
        }],
        keys: KeyColumns::WithPage,
        combine: CombineOp::Sum,
    },
    BehaviorMeasure {
        name: "hvlt_retention",
        files: &[SourceFile {
            file: "Hopkins_Verbal_Learning_Test.csv",
            groups: &[
                group(&["HVLTRDLY"]),
                ItemGroup {
                    items: &["HVLTRT2", "HVLTRT3"],
                    recode: ItemRecode::Reciprocal,
                    op: GroupOp::Min,
                },
            ],
        }],
        keys: KeyColumns::WithPage,
        combine: CombineOp::Product,
    },
    BehaviorMeasure {
        name: "lns",
        files: &[SourceFile {
            file: "Letter_-_Number_Sequencing__PD_.csv",
            groups: &[group(&[
                "LNS1A", "LNS1B", "LNS1C", "LNS2A", "LNS2B", "LNS2C", "LNS3A", "LNS3B", "LNS3C",
                "LNS4A", "LNS4B", "LNS4C", "LNS5A", "LNS5B", "LNS5C", "LNS6A", "LNS6B", "LNS6C",
                "LNS7A", "LNS7B", "LNS7C",
            ])],
        }],
        keys: KeyColumns::WithPage,
        combine: CombineOp::Sum,
    },
    BehaviorMeasure {
        name: "moca",
        files: &[SourceFile {
            file: "Montreal_Cognitive_Assessment__MoCA_.csv",
            groups: &[group(&[
                "MCAALTTM", "MCACUBE", "MCACLCKC", "MCACLCKN", "MCACLCKH", "MCALION", "MCARHINO",
                "MCACAMEL", "MCAFDS", "MCABDS", "MCAVIGIL", "MCASER7", "MCASNTNC", "MCAVF",
                "MCAABSTR", "MCAREC1", "MCAREC2", "MCAREC3", "MCAREC4", "MCAREC5", "MCADATE",
                "MCAMONTH", "MCAYR", "MCADAY", "MCAPLACE", "MCACITY",
            ])],
        }],
        keys: KeyColumns::WithPage,
        combine: CombineOp::Sum,
    },
    BehaviorMeasure {
        name: "pigd",
        files: &[
            SourceFile {
                file: "MDS_UPDRS_Part_II__Patient_Questionnaire.csv",
                groups: &[group(&["NP2WALK", "NP2FREZ"])],
            },
            SourceFile {
                file: "MDS_UPDRS_Part_III.csv",
                groups: &[group(&["NP3GAIT", "NP3FRZGT", "NP3PSTBL"])],
            },
        ],
        keys: KeyColumns::NoPage,
        combine: CombineOp::Mean {
            ignore_nulls: false,
        },
    },
    BehaviorMeasure {
        name: "quip",
        files: &[SourceFile {
            file: "QUIP_Current_Short.csv",
            groups: &[
                ItemGroup {
                    items: &["CNTRLGMB", "TMGAMBLE"],
                    recode: ItemRecode::Identity,
                    op: GroupOp::Any,
                },
                ItemGroup {
                    items: &["CNTRLSEX", "TMSEX"],
                    recode: ItemRecode::Identity,
                    op: GroupOp::Any,
                },
                ItemGroup {
                    items: &["CNTRLBUY", "TMBUY"],
                    recode: ItemRecode::Identity,
                    op: GroupOp::Any,
                },
                ItemGroup {
                    items: &["CNTRLEAT", "TMEAT"],
                    recode: ItemRecode::Identity,
                    op: GroupOp::Any,
                },
                group(&["TMTORACT", "TMTMTACT", "TMTRWD"]),
            ],
        }],
        keys: KeyColumns::WithPage,
        combine: CombineOp::Sum,
    },
    BehaviorMeasure {
        name: "rbd",
        files: &[SourceFile {
            file: "REM_Sleep_Disorder_Questionnaire.csv",
            groups: &[
                group(&[
                    "DRMVIVID", "DRMAGRAC", "DRMNOCTB", "SLPLMBMV", "SLPINJUR", "DRMVERBL",
                    "DRMFIGHT", "DRMUMV", "DRMOBJFL", "MVAWAKEN", "DRMREMEM", "SLPDSTRB",
                ]),
                ItemGroup {
                    items: &[
                        "STROKE", "HETRA", "PARKISM", "RLS", "NARCLPSY", "DEPRS", "EPILEPSY",
                        "BRNINFM", "CNSOTH",
                    ],
                    recode: ItemRecode::Identity,
                    op: GroupOp::Any,
                },
            ],
        }],
        keys: KeyColumns::WithPage,
        combine: CombineOp::Sum,
    },
    BehaviorMeasure {
        name: "scopa_aut",
        files: &[SourceFile {
            file: "SCOPA-AUT.csv",
            groups: &[
                recoded(
                    &[
                        "SCAU1", "SCAU2", "SCAU3", "SCAU4", "SCAU5", "SCAU6", "SCAU7", "SCAU8",
                        "SCAU9", "SCAU10", "SCAU11", "SCAU12", "SCAU13", "SCAU14", "SCAU15",
                        "SCAU16", "SCAU17", "SCAU18", "SCAU19", "SCAU20", "SCAU21",
                    ],
                    ItemRecode::NineToThree,
                ),
                recoded(
                    &["SCAU22", "SCAU23", "SCAU24", "SCAU25"],
                    ItemRecode::NineToZero,
                ),
            ],
        }],
        keys: KeyColumns::WithPage,
        combine: CombineOp::Sum,
    },
    BehaviorMeasure {
        name: "se_adl",
        files: &[SourceFile {
            file: "Modified_Schwab_+_England_ADL.csv",
            groups: &[group(&["MSEADLG"])],
        }],
        keys: KeyColumns::WithPage,
        combine: CombineOp::Sum,
    },
    BehaviorMeasure {
        name: "semantic_fluency",
        files: &[SourceFile {
            file: "Semantic_Fluency.csv",
            groups: &[group(&["VLTANIM", "VLTVEG", "VLTFRUIT"])],
        }],
        keys: KeyColumns::WithPage,
        combine: CombineOp::Sum,
    },
    BehaviorMeasure {
        name: "stai_state",
        files: &[SourceFile {
            file: "State-Trait_Anxiety_Inventory.csv",
            groups: &[
                group(&[
                    "STAIAD3", "STAIAD4", "STAIAD6", "STAIAD7", "STAIAD9", "STAIAD12", "STAIAD13",
                    "STAIAD14", "STAIAD17", "STAIAD18",
                ]),
                recoded(
                    &[
                        "STAIAD1", "STAIAD2", "STAIAD5", "STAIAD8", "STAIAD10", "STAIAD11",
                        "STAIAD15", "STAIAD16", "STAIAD19", "STAIAD20",
                    ],
                    ItemRecode::ReverseLikert5,
                ),
            ],
        }],
        keys: KeyColumns::WithPage,
        combine: CombineOp::Sum,
    },
    BehaviorMeasure {
        name: "stai_trait",
        files: &[SourceFile {
            file: "State-Trait_Anxiety_Inventory.csv",
            groups: &[
                group(&[
                    "STAIAD22", "STAIAD24", "STAIAD25", "STAIAD28", "STAIAD29", "STAIAD31",
                    "STAIAD32", "STAIAD35", "STAIAD37", "STAIAD38", "STAIAD40",
                ]),
                recoded(
                    &[
                        "STAIAD21", "STAIAD23", "STAIAD26", "STAIAD27", "STAIAD30", "STAIAD33",
                        "STAIAD34", "STAIAD36", "STAIAD39",
                    ],
                    ItemRecode::ReverseLikert5,
                ),
            ],
        }],
        keys: KeyColumns::WithPage,
        combine: CombineOp::Sum,
    },
    BehaviorMeasure {
        name: "symbol_digit",
        files: &[SourceFile {
            file: "Symbol_Digit_Modalities.csv",
            groups: &[group(&["SDMTOTAL"])],
        }],
        keys: KeyColumns::WithPage,
        combine: CombineOp::Sum,
    },
    BehaviorMeasure {
        name: "systolic_bp_drop",
        files: &[SourceFile {
            file: "Vital_Signs.csv",
            groups: &[
                group(&["SYSSUP"]),
                recoded(&["SYSSTND"], ItemRecode::Negate),
            ],
        }],
        keys: KeyColumns::WithPage,
        combine: CombineOp::Sum,
    },
    BehaviorMeasure {
        name: "tremor",
        files: &[
            SourceFile {
                file: "MDS_UPDRS_Part_II__Patient_Questionnaire.csv",
                groups: &[group(&["NP2TRMR"])],
            },
            SourceFile {
                file: "MDS_UPDRS_Part_III.csv",
                groups: &[group(&[
                    "NP3PTRMR", "NP3PTRML", "NP3KTRMR", "NP3KTRML", "NP3RTARU", "NP3RTALU",
                    "NP3RTARL", "NP3RTALL", "NP3RTALJ", "NP3RTCON",
                ])],
            },
        ],
        keys: KeyColumns::NoPage,
        combine: CombineOp::Mean { ignore_nulls: true },
    },
    BehaviorMeasure {
        name: "updrs_i",
        files: &[
            SourceFile {
                file: "MDS_UPDRS_Part_I.csv",
                groups: &[group(&[
                    "NP1COG", "NP1HALL", "NP1DPRS", "NP1ANXS", "NP1APAT", "NP1DDS",
                ])],
            },
            SourceFile {
                file: "MDS_UPDRS_Part_I__Patient_Questionnaire.csv",
                groups: &[group(&[
                    "NP1SLPN", "NP1SLPD", "NP1PAIN", "NP1URIN", "NP1CNST", "NP1LTHD", "NP1FATG",
                ])],
            },
        ],
        keys: KeyColumns::NoPage,
        combine: CombineOp::Sum,
    },
    BehaviorMeasure {
        name: "updrs_ii",
        files: &[SourceFile {
            file: "MDS_UPDRS_Part_II__Patient_Questionnaire.csv",
            groups: &[group(&[
                "NP2SPCH", "NP2SALV", "NP2SWAL", "NP2EAT", "NP2DRES", "NP2HYGN", "NP2HWRT",
                "NP2HOBB", "NP2TURN", "NP2TRMR", "NP2RISE", "NP2WALK", "NP2FREZ",
            ])],
        }],
        keys: KeyColumns::WithPage,
        combine: CombineOp::Sum,
    },
    BehaviorMeasure {
        name: "updrs_iii",
        files: &[SourceFile {
            file: "MDS_UPDRS_Part_III.csv",
            groups: &[group(&[
                "NP3SPCH", "NP3FACXP", "NP3RIGN", "NP3RIGRU", "NP3RIGLU", "PN3RIGRL", "NP3RIGLL",
                "NP3FTAPR", "NP3FTAPL", "NP3HMOVR", "NP3HMOVL", "NP3PRSPR", "NP3PRSPL",
                "NP3TTAPR", "NP3TTAPL", "NP3LGAGR", "NP3LGAGL", "NP3RISNG", "NP3GAIT",
                "NP3FRZGT", "NP3PSTBL", "NP3POSTR", "NP3BRADY", "NP3PTRMR", "NP3PTRML",
                "NP3KTRMR", "NP3KTRML", "NP3RTARU", "NP3RTALU", "NP3RTARL", "NP3RTALL",
                "NP3RTALJ", "NP3RTCON",
            ])],
        }],
        keys: KeyColumns::WithPage,
        combine: CombineOp::Sum,
    },
    BehaviorMeasure {
        name: "updrs_iv",
        files: &[SourceFile {
            file: "MDS_UPDRS_Part_IV.csv",
            groups: &[group(&[
                "NP4WDYSK", "NP4DYSKI", "NP4OFF", "NP4FLCTI", "NP4FLCTX", "NP4DYSTN",
            ])],
        }],
        keys: KeyColumns::WithPage,
        combine: CombineOp::Sum,
    },
    BehaviorMeasure {
        name: "upsit",
        files: &[SourceFile {
            file: "University_of_Pennsylvania_Smell_ID_Test.csv",
            groups: &[group(&["UPSITBK1", "UPSITBK2", "UPSITBK3", "UPSITBK4"])],
        }],
        keys: KeyColumns::WithPage,
        combine: CombineOp::Sum,
    },
];

/// How a demographic measure is derived from its source column(s).
#[derive(Debug, Clone, Copy)]
pub(crate) enum DemographicSpec {
    /// Single column mapped through a replace table; unmatched values pass
    /// through unchanged.
    Replace {
        file: &'static str,
        column: &'static str,
        map: &'static [(&'static str, &'static str)],
    },
    /// Single column lowercased.
    Lowercase {
        file: &'static str,
        column: &'static str,
    },
    /// `MM/YYYY` column parsed to a date.
    MonthYearDate {
        file: &'static str,
        column: &'static str,
    },
    /// True when any of the indicator columns is set.
    AnyIndicator {
        file: &'static str,
        columns: &'static [&'static str],
    },
    /// Years elapsed between two `MM/YYYY` columns.
    YearsBetween {
        file: &'static str,
        start: &'static str,
        end: &'static str,
    },
    /// Race indicator columns collapsed to one category; more than one set
    /// flag becomes `multi`.
    RaceIndicators {
        file: &'static str,
        columns: &'static [(&'static str, &'static str)],
    },
    /// Numeric gender code: 0/1 female, 2 male, anything else not stated.
    GenderCode {
        file: &'static str,
        column: &'static str,
    },
    /// Numeric column cast to integer.
    Integer {
        file: &'static str,
        column: &'static str,
    },
    /// Numeric column cast to float.
    Float {
        file: &'static str,
        column: &'static str,
    },
}

impl DemographicSpec {
    pub(crate) fn file(&self) -> &'static str {
        match self {
            DemographicSpec::Replace { file, .. }
            | DemographicSpec::Lowercase { file, .. }
            | DemographicSpec::MonthYearDate { file, .. }
            | DemographicSpec::AnyIndicator { file, .. }
            | DemographicSpec::YearsBetween { file, .. }
            | DemographicSpec::RaceIndicators { file, .. }
            | DemographicSpec::GenderCode { file, .. }
            | DemographicSpec::Integer { file, .. }
            | DemographicSpec::Float { file, .. } => file,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct DemographicMeasure {
    pub name: &'static str,
    pub spec: DemographicSpec,
}

pub(crate) const DEMOGRAPHIC_MEASURES: &[DemographicMeasure] = &[
    DemographicMeasure {
        name: "diagnosis",
        spec: DemographicSpec::Replace {
            file: "Patient_Status.csv",
            column: "ENROLL_CAT",
            map: &[
                ("PD", "pd"),
                ("HC", "hc"),
                ("SWEDD", "swedd"),
                ("PRODROMA", "prod"),
                ("GENPD", "genpd"),
                ("GENUN", "genun"),
                ("REGPD", "regpd"),
                ("REGUN", "regun"),
            ],
        },
    },
    DemographicMeasure {
        name: "date_birth",
        spec: DemographicSpec::MonthYearDate {
            file: "Randomization_table.csv",
            column: "BIRTHDT",
        },
    },
    DemographicMeasure {
        name: "date_diagnosis",
        spec: DemographicSpec::MonthYearDate {
            file: "PD_Features.csv",
            column: "PDDXDT",
        },
    },
    DemographicMeasure {
        name: "date_enroll",
        spec: DemographicSpec::MonthYearDate {
            file: "Randomization_table.csv",
            column: "ENROLLDT",
        },
    },
    DemographicMeasure {
        name: "status",
        spec: DemographicSpec::Lowercase {
            file: "Patient_Status.csv",
            column: "ENROLL_STATUS",
        },
    },
    DemographicMeasure {
        name: "family_history",
        spec: DemographicSpec::AnyIndicator {
            file: "Family_History__PD_.csv",
            columns: &[
                "BIOMOMPD", "BIODADPD", "FULSIBPD", "HAFSIBPD", "MAGPARPD", "PAGPARPD",
                "MATAUPD", "PATAUPD", "KIDSPD",
            ],
        },
    },
    DemographicMeasure {
        name: "age",
        spec: DemographicSpec::YearsBetween {
            file: "Randomization_table.csv",
            start: "BIRTHDT",
            end: "ENROLLDT",
        },
    },
    DemographicMeasure {
        name: "gender",
        spec: DemographicSpec::GenderCode {
            file: "Randomization_table.csv",
            column: "GENDER",
        },
    },
    DemographicMeasure {
        name: "race",
        spec: DemographicSpec::RaceIndicators {
            file: "Screening___Demographics.csv",
            columns: &[
                ("RAINDALS", "indals"),
                ("RAASIAN", "asian"),
                ("RABLACK", "black"),
                ("RAHAWOPI", "hawopi"),
                ("RAWHITE", "white"),
                ("RANOS", "ns"),
            ],
        },
    },
    DemographicMeasure {
        name: "site",
        spec: DemographicSpec::Integer {
            file: "Center-Subject_List.csv",
            column: "CNO",
        },
    },
    DemographicMeasure {
        name: "handedness",
        spec: DemographicSpec::Replace {
            file: "Socio-Economics.csv",
            column: "HANDED",
            map: &[("1", "right"), ("2", "left"), ("3", "both")],
        },
    },
    DemographicMeasure {
        name: "education",
        spec: DemographicSpec::Float {
            file: "Socio-Economics.csv",
            column: "EDUCYRS",
        },
    },
];
