//! The default kitchen knowledge that ships with Sous.

/// `(ingredient, [(substitute, ratio note)])`, in lookup order.
pub(super) const SUBSTITUTIONS: &[(&str, &[(&str, Option<&str>)])] = &[
    (
        "eggs",
        &[
            ("applesauce", Some("1/4 cup per egg")),
            ("flax egg", Some("1 tbsp ground flaxseed + 3 tbsp water per egg")),
            ("mashed banana", Some("1/4 cup per egg")),
            ("chia egg", Some("1 tbsp chia seeds + 3 tbsp water per egg")),
        ],
    ),
    (
        "butter",
        &[
            ("coconut oil", Some("1:1")),
            ("olive oil", Some("3/4 the amount")),
            ("applesauce", Some("1/2 the amount, for baking")),
        ],
    ),
    (
        "milk",
        &[
            ("oat milk", Some("1:1")),
            ("soy milk", Some("1:1")),
            ("water plus butter", Some("1 cup water + 1 1/2 tsp butter per cup")),
        ],
    ),
    (
        "buttermilk",
        &[
            ("milk with lemon juice", Some("1 tbsp lemon juice per cup, rest 5 minutes")),
            ("plain yogurt thinned with milk", Some("3/4 cup yogurt + 1/4 cup milk")),
        ],
    ),
    (
        "heavy cream",
        &[
            ("milk and butter", Some("3/4 cup milk + 1/4 cup melted butter")),
            ("coconut cream", Some("1:1")),
        ],
    ),
    (
        "sour cream",
        &[
            ("greek yogurt", Some("1:1")),
            ("cottage cheese blended smooth", Some("1:1")),
        ],
    ),
    (
        "brown sugar",
        &[
            ("white sugar plus molasses", Some("1 cup sugar + 1 tbsp molasses")),
            ("coconut sugar", Some("1:1")),
        ],
    ),
    (
        "honey",
        &[
            ("maple syrup", Some("1:1")),
            ("agave nectar", Some("1:1")),
        ],
    ),
    (
        "all-purpose flour",
        &[
            ("whole wheat flour", Some("replace up to half")),
            ("gluten-free flour blend", Some("1:1")),
        ],
    ),
    (
        "cake flour",
        &[(
            "all-purpose flour plus cornstarch",
            Some("1 cup minus 2 tbsp flour + 2 tbsp cornstarch"),
        )],
    ),
    (
        "self-rising flour",
        &[(
            "all-purpose flour plus baking powder and salt",
            Some("1 cup flour + 1 1/2 tsp baking powder + 1/4 tsp salt"),
        )],
    ),
    (
        "baking powder",
        &[(
            "baking soda plus cream of tartar",
            Some("1/4 tsp soda + 1/2 tsp cream of tartar per tsp"),
        )],
    ),
    (
        "baking soda",
        &[("baking powder", Some("3 times the amount"))],
    ),
    (
        "cornstarch",
        &[
            ("all-purpose flour", Some("2 tbsp flour per tbsp")),
            ("arrowroot", Some("1:1")),
        ],
    ),
    (
        "breadcrumbs",
        &[
            ("crushed crackers", Some("1:1")),
            ("rolled oats", Some("1:1")),
        ],
    ),
    (
        "white wine",
        &[
            ("chicken stock with a splash of vinegar", None),
            ("white grape juice", Some("1:1")),
        ],
    ),
    (
        "lemon juice",
        &[
            ("lime juice", Some("1:1")),
            ("white wine vinegar", Some("1/2 the amount")),
        ],
    ),
    (
        "garlic",
        &[("garlic powder", Some("1/8 tsp per clove"))],
    ),
    (
        "soy sauce",
        &[
            ("tamari", Some("1:1")),
            ("coconut aminos", Some("1:1")),
        ],
    ),
    (
        "vanilla extract",
        &[("maple syrup", Some("1:1"))],
    ),
    (
        "fresh herbs",
        &[("dried herbs", Some("1/3 the amount"))],
    ),
    (
        "peanut butter",
        &[
            ("sunflower seed butter", Some("1:1")),
            ("tahini", Some("1:1")),
        ],
    ),
];

/// `(term, definition, example)`, in lookup order.
pub(super) const TECHNIQUES: &[(&str, &str, Option<&str>)] = &[
    (
        "fold",
        "Gently combine a light mixture into a heavier one with a spatula, \
         cutting down through the middle and turning over, so the air stays in.",
        Some("Fold the whipped egg whites into the batter."),
    ),
    (
        "blanch",
        "Briefly boil food, then plunge it into ice water to stop the cooking.",
        Some("Blanch the green beans for 2 minutes."),
    ),
    (
        "braise",
        "Brown food in fat, then cook it slowly in a covered pot with a little liquid.",
        None,
    ),
    (
        "deglaze",
        "Add liquid to a hot pan to loosen the browned bits stuck to the bottom.",
        Some("Deglaze the pan with a splash of wine."),
    ),
    (
        "saute",
        "Cook quickly in a small amount of fat over fairly high heat, stirring often.",
        None,
    ),
    (
        "sear",
        "Brown the surface of food over very high heat before finishing it another way.",
        None,
    ),
    (
        "simmer",
        "Cook liquid just below boiling, with small bubbles breaking the surface now and then.",
        None,
    ),
    (
        "poach",
        "Cook gently in liquid that is barely simmering.",
        Some("Poach the eggs in water with a splash of vinegar."),
    ),
    (
        "julienne",
        "Cut into thin matchstick strips.",
        None,
    ),
    (
        "dice",
        "Cut into small, even cubes.",
        None,
    ),
    (
        "mince",
        "Chop as finely as possible.",
        Some("Mince two cloves of garlic."),
    ),
    (
        "cream",
        "Beat fat and sugar together until light and fluffy.",
        Some("Cream the butter and sugar."),
    ),
    (
        "temper",
        "Slowly raise the temperature of a delicate ingredient, like eggs, \
         by whisking in a little hot liquid so it doesn't curdle.",
        None,
    ),
    (
        "proof",
        "Let yeast dough rest and rise before baking.",
        None,
    ),
    (
        "knead",
        "Work dough by pressing, folding, and turning it to develop gluten.",
        None,
    ),
    (
        "emulsify",
        "Combine two liquids that don't normally mix, like oil and vinegar, \
         by whisking one slowly into the other.",
        None,
    ),
    (
        "caramelize",
        "Cook slowly until the natural sugars brown and turn sweet.",
        Some("Caramelize the onions over low heat."),
    ),
    (
        "reduce",
        "Simmer a liquid uncovered so it evaporates and thickens.",
        None,
    ),
    (
        "zest",
        "Grate the colored outer layer of citrus peel, leaving the bitter white pith.",
        None,
    ),
    (
        "whisk",
        "Beat quickly with a whisk to blend ingredients or add air.",
        None,
    ),
    (
        "baste",
        "Spoon fat or juices over food while it cooks to keep it moist.",
        None,
    ),
    (
        "broil",
        "Cook with intense direct heat from above.",
        None,
    ),
];
